//! Temperature sampling task
//!
//! Takes one TMP100 reading per interval and hands it to the logger. In
//! one-shot mode the task sleeps on a timer while the conversion runs, so
//! the logger and status tasks keep running.

use defmt::*;
use eelog_core::traits::SensorError;
use eelog_drivers::sensor::tmp100::CONVERSION_TIMEOUT_MS;
use eelog_drivers::sensor::ConversionMode;
use embassy_time::{Duration, Instant, Ticker, Timer};

use crate::channels::TEMP_READING;
use crate::config::{CONVERSION_POLL_MS, SAMPLE_INTERVAL_S};
use crate::log::Sensor;

#[embassy_executor::task]
pub async fn sampler_task(mut sensor: Sensor) {
    info!("Sampler task started (mode: {:?})", sensor.mode());

    let mut ticker = Ticker::every(Duration::from_secs(SAMPLE_INTERVAL_S));

    loop {
        let reading = match sample(&mut sensor).await {
            Ok(temp_x10) => {
                debug!("Temperature: {}.{}°C", temp_x10 / 10, (temp_x10 % 10).abs());
                Some(temp_x10)
            }
            Err(e) => {
                warn!("Temperature read failed: {:?}", e);
                None
            }
        };
        TEMP_READING.signal(reading);

        ticker.next().await;
    }
}

/// Take one reading without blocking the executor
async fn sample(sensor: &mut Sensor) -> Result<i16, SensorError> {
    if sensor.mode() == ConversionMode::Continuous {
        return sensor.read_continuous();
    }

    sensor.start_one_shot()?;

    let deadline = Instant::now() + Duration::from_millis(u64::from(CONVERSION_TIMEOUT_MS));
    while !sensor.conversion_done()? {
        if Instant::now() >= deadline {
            return Err(SensorError::Timeout);
        }
        Timer::after(Duration::from_millis(CONVERSION_POLL_MS)).await;
    }

    sensor.read_continuous()
}
