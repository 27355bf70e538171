use core::{
    net::{IpAddr, SocketAddr},
    ops::DerefMut,
};

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Timelike};
use chrono_tz::Tz;
use ds323x::DateTimeAccess;
use embassy_net::{
    udp::{PacketMetadata, UdpSocket},
    Stack,
};
use embassy_sync::once_lock::OnceLock;
use log::{error, info};
use smoltcp::wire::DnsQueryType;
use sntpc::{NtpContext, NtpTimestampGenerator};

use crate::{Ds323xTypeConcrete, RtcDs323x};

pub static RTC_CLOCK: OnceLock<RtcDs323x> = OnceLock::new();

/// Change this value to change the local timezone
///
/// Used to pick the displayed month and the day roll-over time
pub const LOCAL_TZ: Tz = chrono_tz::Europe::Moscow;

/// Redraw at least this often so new events show up during the day
const MAX_REFRESH_SECS: u32 = 60 * 60;

#[derive(Debug)]
pub enum RtcClockError {
    // The field is used when debug-printing on error
    I2cClockError(#[allow(dead_code)] <Ds323xTypeConcrete as DateTimeAccess>::Error),
    ClockCellNotSet,
}

/// Convenience wrapper to access the I2C bus attached external RTC that is gated behind all those
/// locks and mutexes, with error messaging.
pub fn access_rtc_clock<T, F>(f: F) -> Result<T, RtcClockError>
where
    F: FnOnce(&mut Ds323xTypeConcrete) -> Result<T, <Ds323xTypeConcrete as DateTimeAccess>::Error>,
{
    RTC_CLOCK
        .try_get()
        .ok_or(RtcClockError::ClockCellNotSet)
        .inspect_err(|_e| {
            error!("RTC_CLOCK is not set!");
        })?
        .lock(|rtc_lock| {
            let mut rtc_borrow = rtc_lock.borrow_mut();
            f(rtc_borrow.deref_mut())
        })
        .map_err(RtcClockError::I2cClockError)
        .inspect_err(|e| {
            error!("RTC clock error: {e:?}");
        })
}

/// Get UTC time from the RTC clock
pub fn get_rtc_time() -> Result<NaiveDateTime, RtcClockError> {
    access_rtc_clock(|rtc| rtc.datetime())
}

/// Set the RTC module time, in UTC
pub fn set_rtc_clock(new_datetime: &NaiveDateTime) -> Result<(), RtcClockError> {
    access_rtc_clock(|rtc| rtc.set_datetime(new_datetime))
}

/// Current time in [`LOCAL_TZ`]
pub fn local_now() -> Result<DateTime<Tz>, RtcClockError> {
    get_rtc_time().map(|utc| LOCAL_TZ.from_utc_datetime(&utc))
}

/// How long to wait before the next redraw: until just past local midnight, or
/// [`MAX_REFRESH_SECS`] if that comes first
pub fn until_next_refresh(now: &DateTime<Tz>) -> embassy_time::Duration {
    let until_midnight = 24 * 60 * 60 - now.num_seconds_from_midnight();
    embassy_time::Duration::from_secs(until_midnight.min(MAX_REFRESH_SECS) as u64 + 5)
}

#[derive(Clone, Copy, Default)]
pub struct TimestampGenerator {
    timestamp: NaiveDateTime,
}

impl NtpTimestampGenerator for TimestampGenerator {
    fn init(&mut self) {
        // An unset clock reads as the epoch, the server answer does not depend on it
        self.timestamp = get_rtc_time().unwrap_or_default();
    }

    fn timestamp_sec(&self) -> u64 {
        self.timestamp.and_utc().timestamp().try_into().unwrap_or(0)
    }

    fn timestamp_subsec_micros(&self) -> u32 {
        self.timestamp.and_utc().timestamp_subsec_micros()
    }
}

// Maybe replace with a list and try using some other server if this one is down?
const NTP_SERVER: &str = "pool.ntp.org";
const NTP_PORT: u16 = 123;

/// Get time from an NTP server
pub async fn get_ntp_time(stack: Stack<'_>) -> Option<NaiveDateTime> {
    let ntp_addresses = match stack.dns_query(NTP_SERVER, DnsQueryType::A).await {
        Ok(addresses) => addresses,
        Err(e) => {
            error!("Failed to resolve DNS for ntp server {NTP_SERVER:?}: {e:?}");
            return None;
        }
    };
    // Maybe iterate over the received ip addresses?
    let Some(&ntp_server_addr) = ntp_addresses.first() else {
        error!("No addresses for ntp server {NTP_SERVER:?}");
        return None;
    };

    let mut rx_meta = [PacketMetadata::EMPTY; 16];
    let mut rx_buffer = [0; 4096];
    let mut tx_meta = [PacketMetadata::EMPTY; 16];
    let mut tx_buffer = [0; 4096];

    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    if let Err(e) = socket.bind(NTP_PORT) {
        error!("Failed to bind ntp socket: {e:?}");
        return None;
    }

    let ntp_context = NtpContext::new(TimestampGenerator::default());

    let ntp_result = sntpc::get_time(
        SocketAddr::new(IpAddr::from(ntp_server_addr), NTP_PORT),
        &socket,
        ntp_context,
    )
    .await;

    match ntp_result {
        Ok(time) => TimeDelta::new(
            time.sec().into(),
            sntpc::fraction_to_nanoseconds(time.sec_fraction()),
        )
        .map(|since_epoch| NaiveDateTime::UNIX_EPOCH + since_epoch),
        Err(e) => {
            error!("Failed to request time: {e:?}");
            None
        }
    }
}

/// Set RTC time to what we get from an NTP server
pub async fn synchronize_ntp_time_to_rtc(net_stack: Stack<'_>) -> bool {
    let Some(new_time) = get_ntp_time(net_stack).await else {
        error!("Failed to synchronize time over the network");
        return false;
    };
    info!("Network time is {new_time} UTC");
    set_rtc_clock(&new_time).is_ok()
}
