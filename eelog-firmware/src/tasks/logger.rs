//! Log writer task
//!
//! Appends each temperature sample to the EEPROM log. Failed sensor
//! reads still consume a sequence number so gaps show up in the log.

use defmt::*;

use crate::channels::TEMP_READING;
use crate::log::{with_log, Sample};

#[embassy_executor::task]
pub async fn logger_task() {
    info!("Logger task started");

    let mut sequence: u16 = 0;

    loop {
        let reading = TEMP_READING.wait().await;
        let this = sequence;
        sequence = sequence.wrapping_add(1);

        let Some(temp_x10) = reading else {
            continue;
        };

        let sample = Sample {
            sequence: this,
            temp_x10,
        };

        match with_log(|log| log.write(&sample.to_bytes())) {
            Some(Ok(())) => debug!("Logged {:?}", sample),
            Some(Err(e)) => warn!(
                "Sample {} not logged: {:?} ({} bytes committed)",
                sample.sequence, e.error, e.committed
            ),
            None => warn!("Log not available"),
        }
    }
}
