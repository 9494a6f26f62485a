/// Device type byte identifying the addressed subsystem in a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DeviceType {
    Version = 0,
    UltrasonicSensor = 1,
    TemperatureSensor = 2,
    LightSensor = 3,
    Potentiometer = 4,
    Joystick = 5,
    Gyro = 6,
    SoundSensor = 7,
    RgbLed = 8,
    SevenSegment = 9,
    Motor = 10,
    Servo = 11,
    Encoder = 12,
    Ir = 13,
    IrRemote = 14,
    PirMotion = 15,
    Infrared = 16,
    LineFollower = 17,
    IrRemoteCode = 18,
    Shutter = 20,
    LimitSwitch = 21,
    Button = 22,
    Humiture = 23,
    FlameSensor = 24,
    GasSensor = 25,
    Compass = 26,
    Temperature = 27,
    Digital = 30,
    Analog = 31,
    Pwm = 32,
    ServoPin = 33,
    Tone = 34,
    ButtonInner = 35,
    UltrasonicArduino = 36,
    PulseIn = 37,
    Stepper = 40,
    LedMatrix = 41,
    Timer = 50,
    JoystickMove = 52,
    /// Kit-level commands (battery, firmware mode)
    CommonCommand = 60,
    /// On-board encoder motor driver
    EncoderBoard = 61,
}

impl DeviceType {
    /// Returns the wire code
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<DeviceType> for u8 {
    fn from(device: DeviceType) -> Self {
        device.code()
    }
}
