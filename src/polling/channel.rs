use std::fmt;

use serde::{Serialize, Deserialize};

use crate::protocol::GyroAxis;

/// A sensor reading that can be polled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PollChannel {
    Ultrasonic,
    LineFollow,
    Light,
    Temperature,
    Sound,
    Pir,
    GyroX,
    GyroY,
    GyroZ,
    Humidity,
    Fire,
    Gas,
    Joystick,
    LimitSwitch,
    Potentiometer,
    Encoder,
}

impl PollChannel {
    /// Every channel, in declaration order
    pub const ALL: [PollChannel; 16] = [
        PollChannel::Ultrasonic,
        PollChannel::LineFollow,
        PollChannel::Light,
        PollChannel::Temperature,
        PollChannel::Sound,
        PollChannel::Pir,
        PollChannel::GyroX,
        PollChannel::GyroY,
        PollChannel::GyroZ,
        PollChannel::Humidity,
        PollChannel::Fire,
        PollChannel::Gas,
        PollChannel::Joystick,
        PollChannel::LimitSwitch,
        PollChannel::Potentiometer,
        PollChannel::Encoder,
    ];

    /// Channel polled for a gyroscope axis
    pub fn gyro(axis: GyroAxis) -> Self {
        match axis {
            GyroAxis::X => PollChannel::GyroX,
            GyroAxis::Y => PollChannel::GyroY,
            GyroAxis::Z => PollChannel::GyroZ,
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            PollChannel::Ultrasonic => "ultrasonic",
            PollChannel::LineFollow => "line-follow",
            PollChannel::Light => "light",
            PollChannel::Temperature => "temperature",
            PollChannel::Sound => "sound",
            PollChannel::Pir => "pir",
            PollChannel::GyroX => "gyro-x",
            PollChannel::GyroY => "gyro-y",
            PollChannel::GyroZ => "gyro-z",
            PollChannel::Humidity => "humidity",
            PollChannel::Fire => "fire",
            PollChannel::Gas => "gas",
            PollChannel::Joystick => "joystick",
            PollChannel::LimitSwitch => "limit-switch",
            PollChannel::Potentiometer => "potentiometer",
            PollChannel::Encoder => "encoder",
        }
    }
}

impl fmt::Display for PollChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
