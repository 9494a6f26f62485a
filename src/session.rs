//! Command session
//!
//! A [`Session`] ties together the board selection, the polling registry and a
//! transport, and exposes one method per board operation. Write operations
//! send a single frame; sensor operations start a recurring read that runs
//! until the matching `stop_*` call or until the session is dropped.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::core::{Error, Result, SessionConfig};
use crate::device::{DeviceContext, DeviceDescriptor, PortTable};
use crate::polling::{PollChannel, PollingRegistry};
use crate::protocol::{
    note_frequency, Command, EncoderReading, Frame, GyroAxis, JoystickAxis, KitMode, LedPosition,
    ShutterAction,
};
use crate::transport::{SerialRequest, Transport};
use crate::util::parse_hex;

/// Gyroscope port used when none is given
pub const DEFAULT_GYRO_PORT: u8 = 1;

/// Slot the temperature probe is read from
pub const TEMPERATURE_SLOT: u8 = 1;

/// Client session for one board
pub struct Session {
    config: SessionConfig,
    device: DeviceContext,
    transport: Arc<dyn Transport>,
    polls: PollingRegistry,
}

impl Session {
    /// Creates a session on the current tokio runtime
    pub fn new(config: SessionConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let device = DeviceContext::new(&DeviceDescriptor::new(config.device.clone()));
        let polls = PollingRegistry::new(Arc::clone(&transport), config.poll_interval)?;
        Ok(Session {
            config,
            device,
            transport,
            polls,
        })
    }

    /// Configuration the session was created with
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Shared board selection
    pub fn device(&self) -> &DeviceContext {
        &self.device
    }

    /// Selects a new board
    pub fn set_device(&self, descriptor: &DeviceDescriptor) {
        self.device.set_device(descriptor);
    }

    /// Port table of the selected board
    pub fn port_table(&self) -> PortTable {
        self.device.port_table()
    }

    /// Active polls
    pub fn polls(&self) -> &PollingRegistry {
        &self.polls
    }

    /// Encodes a command for the selected board
    pub fn encode(&self, command: &Command) -> Frame {
        command.to_frame(self.device.board())
    }

    /// Encodes and sends a command once
    pub fn send(&self, command: &Command) {
        let frame = self.encode(command);
        debug!(?command, %frame, "sending frame");
        self.transport.deliver(SerialRequest::from_frame(&frame));
    }

    /// Starts polling `command` on `channel` at the session's period
    pub fn poll(&self, channel: PollChannel, command: &Command) {
        self.poll_every(channel, command, None);
    }

    /// Starts polling `command` on `channel`, optionally at a custom period
    pub fn poll_every(&self, channel: PollChannel, command: &Command, interval: Option<Duration>) {
        let frame = self.encode(command);
        self.polls.start_polling(channel, frame, interval);
    }

    /// Sends a frame given as hex text, e.g. `"ff 55 04 00 01 00 00"`
    ///
    /// Empty text sends nothing.
    pub fn send_hex(&self, text: &str) -> Result<()> {
        let params = parse_hex(text)?;
        if params.is_empty() {
            return Ok(());
        }
        debug!(frame = text, "sending hex frame");
        self.transport.deliver(SerialRequest::from_text(text, params));
        Ok(())
    }

    /// Sends raw bytes unchanged
    pub fn send_raw(&self, bytes: &[u8]) {
        debug!(len = bytes.len(), "sending raw bytes");
        self.transport.deliver(SerialRequest::from_bytes(bytes.to_vec()));
    }

    // Auxiliary

    pub fn get_version(&self) {
        self.send(&Command::Version);
    }

    pub fn get_battery(&self) {
        self.send(&Command::Battery);
    }

    /// Switches the kit firmware mode; the kit code follows the selected board
    pub fn set_mode(&self, mode: KitMode) {
        self.send(&Command::SetMode { mode });
    }

    // Motion

    /// Drives a DC motor; mBot uses ports 9 and 10, the other boards 1 and 2
    pub fn set_dc_motor(&self, port: u8, speed: i32) {
        self.send(&Command::DcMotor { port, speed });
    }

    pub fn stop_motor(&self, port: u8) {
        self.set_dc_motor(port, 0);
    }

    pub fn set_encoder_motor(&self, port: u8, slot: u8, speed: i32) {
        self.send(&Command::EncoderMotor { port, slot, speed });
    }

    pub fn set_common_encoder_motor(&self, slot: u8, speed: i32, distance: i32) {
        self.send(&Command::CommonEncoderMotor { slot, speed, distance });
    }

    pub fn read_encoder_motor(&self, port: u8, slot: u8, reading: EncoderReading) {
        self.poll(PollChannel::Encoder, &Command::ReadEncoderMotor { port, slot, reading });
    }

    pub fn stop_encoder_motor(&self) {
        self.polls.stop_polling(PollChannel::Encoder);
    }

    pub fn set_stepper_motor(&self, port: u8, speed: i32, distance: i32) {
        self.send(&Command::StepperMotor { port, speed, distance });
    }

    pub fn set_servo_motor(&self, port: u8, slot: u8, angle: u8) {
        self.send(&Command::ServoMotor { port, slot, angle });
    }

    // Sensors

    pub fn open_ultrasonic(&self, port: u8) {
        self.poll(PollChannel::Ultrasonic, &Command::Ultrasonic { port });
    }

    pub fn stop_ultrasonic(&self) {
        self.polls.stop_polling(PollChannel::Ultrasonic);
    }

    pub fn open_line_follower(&self, port: u8) {
        self.poll(PollChannel::LineFollow, &Command::LineFollower { port });
    }

    pub fn stop_line_follower(&self) {
        self.polls.stop_polling(PollChannel::LineFollow);
    }

    pub fn open_light_sensor(&self, port: u8) {
        self.poll(PollChannel::Light, &Command::Light { port });
    }

    pub fn stop_light_sensor(&self) {
        self.polls.stop_polling(PollChannel::Light);
    }

    pub fn open_temperature(&self, port: u8) {
        self.poll(
            PollChannel::Temperature,
            &Command::Temperature { port, slot: TEMPERATURE_SLOT },
        );
    }

    pub fn stop_temperature(&self) {
        self.polls.stop_polling(PollChannel::Temperature);
    }

    pub fn open_sound(&self, port: u8) {
        self.poll(PollChannel::Sound, &Command::Sound { port });
    }

    pub fn stop_sound(&self) {
        self.polls.stop_polling(PollChannel::Sound);
    }

    pub fn open_pir(&self, port: u8) {
        self.poll(PollChannel::Pir, &Command::Pir { port });
    }

    pub fn stop_pir(&self) {
        self.polls.stop_polling(PollChannel::Pir);
    }

    /// Polls one gyroscope axis; each axis has its own channel
    pub fn read_gyro(&self, axis: GyroAxis, port: Option<u8>) {
        let port = port.unwrap_or(DEFAULT_GYRO_PORT);
        self.poll(PollChannel::gyro(axis), &Command::Gyro { port, axis });
    }

    /// Stops all three gyroscope axes
    pub fn stop_gyro(&self) {
        for axis in [GyroAxis::X, GyroAxis::Y, GyroAxis::Z] {
            self.polls.stop_polling(PollChannel::gyro(axis));
        }
    }

    pub fn open_humidity(&self, port: u8, slot: u8) {
        self.poll(PollChannel::Humidity, &Command::Humidity { port, slot });
    }

    pub fn stop_humidity(&self) {
        self.polls.stop_polling(PollChannel::Humidity);
    }

    pub fn open_flame(&self, port: u8) {
        self.poll(PollChannel::Fire, &Command::Flame { port });
    }

    pub fn stop_flame(&self) {
        self.polls.stop_polling(PollChannel::Fire);
    }

    pub fn open_gas(&self, port: u8) {
        self.poll(PollChannel::Gas, &Command::Gas { port });
    }

    pub fn stop_gas(&self) {
        self.polls.stop_polling(PollChannel::Gas);
    }

    // Indicators

    pub fn turn_on_led(&self, port: u8, slot: u8, position: LedPosition, red: u8, green: u8, blue: u8) {
        self.send(&Command::Led { port, slot, position, red, green, blue });
    }

    pub fn turn_off_led(&self, port: u8, slot: u8, position: LedPosition) {
        self.turn_on_led(port, slot, position, 0, 0, 0);
    }

    /// Plays a tone; `port` is only sent on 2560 boards
    pub fn play_tone(&self, port: u8, hz: i32, beat: i32) {
        self.send(&Command::Tone { port, hz, beat });
    }

    /// Plays a named note such as `"C4"`
    pub fn play_note(&self, port: u8, note: &str, beat: i32) -> Result<()> {
        let hz = note_frequency(note)
            .ok_or_else(|| Error::protocol(format!("unknown note '{}'", note)))?;
        self.play_tone(port, hz as i32, beat);
        Ok(())
    }

    pub fn set_seven_segment(&self, port: u8, value: f64) {
        self.send(&Command::SevenSegment { port, value });
    }

    // Controls

    /// Reads a joystick axis once right away, then keeps polling it
    pub fn read_joystick(&self, axis: JoystickAxis, port: u8) {
        let command = Command::Joystick { port, axis };
        self.poll(PollChannel::Joystick, &command);
        self.send(&command);
    }

    pub fn stop_joystick(&self) {
        self.polls.stop_polling(PollChannel::Joystick);
    }

    pub fn set_shutter(&self, port: u8, action: ShutterAction) {
        self.send(&Command::Shutter { port, action });
    }

    pub fn read_limit_switch(&self, port: u8, slot: u8) {
        self.poll(PollChannel::LimitSwitch, &Command::LimitSwitch { port, slot });
    }

    pub fn stop_limit_switch(&self) {
        self.polls.stop_polling(PollChannel::LimitSwitch);
    }

    pub fn read_potentiometer(&self, port: u8) {
        self.poll(PollChannel::Potentiometer, &Command::Potentiometer { port });
    }

    pub fn stop_potentiometer(&self) {
        self.polls.stop_polling(PollChannel::Potentiometer);
    }

    /// Cancels every active poll; returns how many were running
    pub fn stop_all(&self) -> usize {
        self.polls.stop_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::BoardType;
    use crate::transport::{ChannelTransport, MethodParams};
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::time::sleep;
    use tokio_test::assert_ok;

    fn session(device: &str) -> (Session, UnboundedReceiver<SerialRequest>) {
        let (transport, rx) = ChannelTransport::new();
        let config = SessionConfig {
            device: device.to_string(),
            ..Default::default()
        };
        let session = Session::new(config, Arc::new(transport)).unwrap();
        (session, rx)
    }

    fn sent(rx: &mut UnboundedReceiver<SerialRequest>) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        while let Ok(request) = rx.try_recv() {
            out.push(request.params);
        }
        out
    }

    #[tokio::test]
    async fn test_write_operations_send_once() {
        let (session, mut rx) = session("mcore");
        session.set_dc_motor(1, 85);
        session.stop_motor(9);
        session.set_servo_motor(3, 1, 180);

        assert_eq!(
            sent(&mut rx),
            vec![
                vec![0xFF, 0x55, 0x06, 0x00, 0x02, 0x0A, 0x01, 0x55, 0x00],
                vec![0xFF, 0x55, 0x06, 0x00, 0x02, 0x0A, 0x09, 0x00, 0x00],
                vec![0xFF, 0x55, 0x06, 0x00, 0x02, 0x0B, 0x03, 0x01, 0xB4],
            ]
        );
    }

    #[tokio::test]
    async fn test_request_carries_hex_text() {
        let (session, mut rx) = session("mcore");
        session.get_battery();
        let request = rx.try_recv().unwrap();
        assert_eq!(request.method_params, MethodParams::Text("ff 55 04 00 01 3c 70".to_string()));
    }

    #[tokio::test]
    async fn test_board_selection_drives_layout() {
        let (session, mut rx) = session("default");
        assert_eq!(session.device().board(), Some(BoardType::MCore));

        session.play_tone(0x0A, 110, 500);
        session.set_device(&DeviceDescriptor::new("2560"));
        session.play_tone(0x0A, 110, 500);
        session.set_mode(KitMode::Bluetooth);

        let frames = sent(&mut rx);
        assert_eq!(frames[0], vec![0xFF, 0x55, 0x07, 0x00, 0x02, 0x22, 0x6E, 0x00, 0xF4, 0x01]);
        assert_eq!(frames[1], vec![0xFF, 0x55, 0x08, 0x00, 0x02, 0x22, 0x0A, 0x6E, 0x00, 0xF4, 0x01]);
        assert_eq!(frames[2], vec![0xFF, 0x55, 0x05, 0x00, 0x02, 0x3C, 0x11, 0x00]);
    }

    #[tokio::test]
    async fn test_play_note() {
        let (session, mut rx) = session("mcore");
        assert_ok!(session.play_note(0, "A4", 250));
        assert_eq!(sent(&mut rx), vec![vec![0xFF, 0x55, 0x07, 0x00, 0x02, 0x22, 0xB8, 0x01, 0xFA, 0x00]]);

        assert!(session.play_note(0, "X9", 250).is_err());
        assert!(sent(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_send_hex_and_raw() {
        let (session, mut rx) = session("mcore");
        assert_ok!(session.send_hex("ff 55 04 00 01 00 00"));
        assert_ok!(session.send_hex(""));
        session.send_raw(&[0xFF, 0x55, 0x03, 0x00, 0x01, 0x00]);
        assert!(session.send_hex("ff 5g").is_err());

        let requests: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method_params, MethodParams::Text("ff 55 04 00 01 00 00".to_string()));
        assert_eq!(requests[0].params, vec![0xFF, 0x55, 0x04, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(requests[1].method_params, MethodParams::Bytes(vec![0xFF, 0x55, 0x03, 0x00, 0x01, 0x00]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sensor_polls_until_stopped() {
        let (session, mut rx) = session("mcore");
        session.open_ultrasonic(3);
        session.open_temperature(4);
        assert_eq!(session.polls().len(), 2);

        sleep(Duration::from_millis(1700)).await;
        let frames = sent(&mut rx);
        let ultrasonic = vec![0xFF, 0x55, 0x04, 0x00, 0x01, 0x01, 0x03];
        let temperature = vec![0xFF, 0x55, 0x05, 0x00, 0x01, 0x02, 0x04, 0x01];
        assert_eq!(frames.iter().filter(|f| **f == ultrasonic).count(), 2);
        assert_eq!(frames.iter().filter(|f| **f == temperature).count(), 2);

        session.stop_ultrasonic();
        session.stop_temperature();
        sleep(Duration::from_millis(2000)).await;
        assert!(sent(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_gyro_axes_and_stop_gyro() {
        let (session, mut rx) = session("2560");
        session.read_gyro(GyroAxis::X, None);
        session.read_gyro(GyroAxis::Z, Some(6));
        assert_eq!(
            session.polls().active_channels(),
            vec![PollChannel::GyroX, PollChannel::GyroZ]
        );

        sleep(Duration::from_millis(900)).await;
        let frames = sent(&mut rx);
        assert!(frames.contains(&vec![0xFF, 0x55, 0x05, 0x00, 0x01, 0x06, 0x01, 0x01]));
        assert!(frames.contains(&vec![0xFF, 0x55, 0x05, 0x00, 0x01, 0x06, 0x06, 0x03]));

        session.stop_gyro();
        assert!(session.polls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_joystick_sends_immediately() {
        let (session, mut rx) = session("mcore");
        session.read_joystick(JoystickAxis::X, 2);
        let joystick = vec![0xFF, 0x55, 0x05, 0x00, 0x01, 0x05, 0x02, 0x01];
        assert_eq!(sent(&mut rx), vec![joystick.clone()]);

        sleep(Duration::from_millis(850)).await;
        assert_eq!(sent(&mut rx), vec![joystick]);
        session.stop_joystick();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reopen_keeps_single_poll() {
        let (session, mut rx) = session("mcore");
        session.open_light_sensor(6);
        session.open_light_sensor(3);
        assert_eq!(session.polls().len(), 1);

        sleep(Duration::from_millis(850)).await;
        assert_eq!(sent(&mut rx), vec![vec![0xFF, 0x55, 0x04, 0x00, 0x01, 0x03, 0x03]]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_all_and_unknown_stop() {
        let (session, mut rx) = session("orion");
        session.stop_gas();
        session.open_gas(1);
        session.open_flame(2);
        session.read_potentiometer(3);
        session.read_limit_switch(4, 1);
        session.open_humidity(1, 0);
        session.read_encoder_motor(1, 1, EncoderReading::Position);
        assert_eq!(session.stop_all(), 6);

        sleep(Duration::from_millis(2000)).await;
        assert!(sent(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let (transport, _rx) = ChannelTransport::new();
        let config = SessionConfig {
            poll_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(Session::new(config, Arc::new(transport)).is_err());
    }
}
