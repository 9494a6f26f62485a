//! Logical commands and their frame layouts.

use crate::core::Direction;
use crate::device::{BoardProfile, BoardType};
use super::device_type::DeviceType;
use super::frame::Frame;
use super::numeric::Operand::{self, Byte, Float, Word};

/// Port byte the common encoder motor driver is addressed with (its I²C slot)
pub const ENCODER_I2C_PORT: u8 = 0x08;

/// Sub-command of [`DeviceType::CommonCommand`] that reads the battery level
pub const BATTERY_SUBCOMMAND: u8 = 0x70;

/// Gyroscope axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GyroAxis {
    X = 1,
    Y = 2,
    Z = 3,
}

/// Joystick axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoystickAxis {
    X = 1,
    Y = 2,
}

/// Which of the on-board LEDs to address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedPosition {
    Both = 0,
    Left = 1,
    Right = 2,
}

/// Value reported by an encoder motor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderReading {
    Position = 1,
    Speed = 2,
}

/// Camera shutter action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutterAction {
    Press = 0,
    Release = 1,
    FocusOn = 2,
    FocusOff = 3,
}

/// Firmware mode of a kit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KitMode {
    Bluetooth = 0,
    ObstacleAvoidance = 1,
    SelfBalance = 2,
    InfraredRemote = 3,
}

/// A logical operation on the board
///
/// Integer fields wider than a byte are masked when encoded, matching the
/// firmware's acceptance of raw values.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Read the firmware version
    Version,
    /// Read the battery level
    Battery,
    /// Switch the kit's firmware mode
    SetMode { mode: KitMode },

    /// Drive a DC motor; negative speeds reverse
    DcMotor { port: u8, speed: i32 },
    /// Drive an on-board encoder motor
    EncoderMotor { port: u8, slot: u8, speed: i32 },
    /// Drive an encoder motor on the external driver for a distance
    CommonEncoderMotor { slot: u8, speed: i32, distance: i32 },
    /// Read position or speed of an on-board encoder motor
    ReadEncoderMotor { port: u8, slot: u8, reading: EncoderReading },
    /// Drive a stepper motor for a distance
    StepperMotor { port: u8, speed: i32, distance: i32 },
    /// Move a servo to an angle
    ServoMotor { port: u8, slot: u8, angle: u8 },

    Ultrasonic { port: u8 },
    LineFollower { port: u8 },
    Light { port: u8 },
    Temperature { port: u8, slot: u8 },
    Sound { port: u8 },
    Pir { port: u8 },
    Gyro { port: u8, axis: GyroAxis },
    Humidity { port: u8, slot: u8 },
    Flame { port: u8 },
    Gas { port: u8 },
    Joystick { port: u8, axis: JoystickAxis },
    LimitSwitch { port: u8, slot: u8 },
    Potentiometer { port: u8 },

    /// Set an RGB LED colour; all zero turns it off
    Led {
        port: u8,
        slot: u8,
        position: LedPosition,
        red: u8,
        green: u8,
        blue: u8,
    },
    /// Play a tone; the port is dropped on boards with a fixed buzzer
    Tone { port: u8, hz: i32, beat: i32 },
    /// Show a number on a seven-segment display
    SevenSegment { port: u8, value: f64 },
    /// Trigger a camera shutter
    Shutter { port: u8, action: ShutterAction },
}

impl Command {
    /// Direction byte this command is sent with
    pub fn direction(&self) -> Direction {
        match self {
            Command::Version
            | Command::Battery
            | Command::ReadEncoderMotor { .. }
            | Command::Ultrasonic { .. }
            | Command::LineFollower { .. }
            | Command::Light { .. }
            | Command::Temperature { .. }
            | Command::Sound { .. }
            | Command::Pir { .. }
            | Command::Gyro { .. }
            | Command::Humidity { .. }
            | Command::Flame { .. }
            | Command::Gas { .. }
            | Command::Joystick { .. }
            | Command::LimitSwitch { .. }
            | Command::Potentiometer { .. } => Direction::Read,
            _ => Direction::Write,
        }
    }

    /// Device type byte and operands for the given board rules
    pub fn layout(&self, profile: &BoardProfile) -> (DeviceType, Vec<Operand>) {
        let port = |p: u8| Byte(p as i64);
        match *self {
            Command::Version => (DeviceType::Version, vec![Byte(0)]),
            Command::Battery => (DeviceType::CommonCommand, vec![Byte(BATTERY_SUBCOMMAND as i64)]),
            Command::SetMode { mode } => (
                DeviceType::CommonCommand,
                vec![Byte(profile.kit_code as i64), Byte(mode as i64)],
            ),

            Command::DcMotor { port: p, speed } => {
                (DeviceType::Motor, vec![port(p), Word(speed as i64)])
            }
            Command::EncoderMotor { port: p, slot, speed } => (
                DeviceType::EncoderBoard,
                vec![port(p), Byte(slot as i64), Word(speed as i64)],
            ),
            Command::CommonEncoderMotor { slot, speed, distance } => (
                DeviceType::Encoder,
                vec![
                    port(ENCODER_I2C_PORT),
                    Byte(slot as i64),
                    Word(speed as i64),
                    Word(distance as i64),
                ],
            ),
            Command::ReadEncoderMotor { port: p, slot, reading } => (
                DeviceType::EncoderBoard,
                vec![port(p), Byte(slot as i64), Byte(reading as i64)],
            ),
            Command::StepperMotor { port: p, speed, distance } => (
                DeviceType::Stepper,
                vec![port(p), Word(speed as i64), Word(distance as i64)],
            ),
            Command::ServoMotor { port: p, slot, angle } => (
                DeviceType::Servo,
                vec![port(p), Byte(slot as i64), Byte(angle as i64)],
            ),

            Command::Ultrasonic { port: p } => (DeviceType::UltrasonicSensor, vec![port(p)]),
            Command::LineFollower { port: p } => (DeviceType::LineFollower, vec![port(p)]),
            Command::Light { port: p } => (DeviceType::LightSensor, vec![port(p)]),
            Command::Temperature { port: p, slot } => {
                (DeviceType::TemperatureSensor, vec![port(p), Byte(slot as i64)])
            }
            Command::Sound { port: p } => (DeviceType::SoundSensor, vec![port(p)]),
            Command::Pir { port: p } => (DeviceType::PirMotion, vec![port(p)]),
            Command::Gyro { port: p, axis } => (DeviceType::Gyro, vec![port(p), Byte(axis as i64)]),
            Command::Humidity { port: p, slot } => {
                (DeviceType::TemperatureSensor, vec![port(p), Byte(slot as i64)])
            }
            Command::Flame { port: p } => (DeviceType::FlameSensor, vec![port(p)]),
            Command::Gas { port: p } => (DeviceType::GasSensor, vec![port(p)]),
            Command::Joystick { port: p, axis } => {
                (DeviceType::Joystick, vec![port(p), Byte(axis as i64)])
            }
            Command::LimitSwitch { port: p, slot } => {
                (DeviceType::LimitSwitch, vec![port(p), Byte(slot as i64)])
            }
            Command::Potentiometer { port: p } => (DeviceType::Potentiometer, vec![port(p)]),

            Command::Led { port: p, slot, position, red, green, blue } => (
                DeviceType::RgbLed,
                vec![
                    port(p),
                    Byte(slot as i64),
                    Byte(position as i64),
                    Byte(red as i64),
                    Byte(green as i64),
                    Byte(blue as i64),
                ],
            ),
            Command::Tone { port: p, hz, beat } => {
                let mut operands = Vec::with_capacity(3);
                if profile.tone_has_port {
                    operands.push(port(p));
                }
                operands.push(Word(hz as i64));
                operands.push(Word(beat as i64));
                (DeviceType::Tone, operands)
            }
            Command::SevenSegment { port: p, value } => {
                (DeviceType::SevenSegment, vec![port(p), Float(value)])
            }
            Command::Shutter { port: p, action } => {
                (DeviceType::Shutter, vec![port(p), Byte(action as i64)])
            }
        }
    }

    /// Encodes the command for a board
    pub fn to_frame(&self, board: Option<BoardType>) -> Frame {
        let profile = BoardProfile::for_board(board);
        let (device, operands) = self.layout(&profile);
        Frame::build(self.direction(), device, &operands)
    }
}
