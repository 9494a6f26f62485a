use std::sync::Arc;
use std::time::Duration;

use mblock_serial::protocol::{GyroAxis, LedPosition};
use mblock_serial::{
    ChannelTransport, DeviceDescriptor, SerialConfig, SerialTransport, Session, SessionConfig,
    Transport,
};
use tokio::time::sleep;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> mblock_serial::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    // Optional arguments: <session config JSON> <serial device>
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };

    let transport: Arc<dyn Transport> = match args.next() {
        Some(path) => {
            let serial = SerialConfig {
                path,
                ..Default::default()
            };
            Arc::new(SerialTransport::open(&serial)?)
        }
        None => {
            let (transport, mut requests) = ChannelTransport::new();
            tokio::spawn(async move {
                while let Some(request) = requests.recv().await {
                    match request.to_json() {
                        Ok(json) => println!("{}", json),
                        Err(e) => eprintln!("Encoding error: {}", e),
                    }
                }
            });
            Arc::new(transport)
        }
    };

    let session = Session::new(config, transport)?;
    info!(board = %session.device().info().name, "session ready");

    session.get_version();
    session.turn_on_led(7, 2, LedPosition::Both, 0, 64, 0);
    session.play_note(0, "C4", 250)?;

    // Drive forward for a second while reading the ultrasonic sensor
    session.open_ultrasonic(3);
    session.set_dc_motor(9, -100);
    session.set_dc_motor(10, 100);
    sleep(Duration::from_secs(2)).await;
    session.stop_motor(9);
    session.stop_motor(10);
    session.stop_ultrasonic();

    // Switch to an Auriga and read its gyroscope
    session.set_device(&DeviceDescriptor::new("2560"));
    session.read_gyro(GyroAxis::X, None);
    session.play_tone(45, 440, 500);
    sleep(Duration::from_secs(2)).await;

    let stopped = session.stop_all();
    info!(stopped, "done");
    Ok(())
}
