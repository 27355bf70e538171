//! Google Calendar API v3 as an [`EventSource`].
//!
//! Access tokens are obtained with the OAuth refresh token grant and only kept
//! in memory, a reboot simply asks for a new one.

use alloc::{format, string::String};
use core::fmt;

use chrono::{DateTime, FixedOffset};
use embassy_net::{dns::DnsSocket, tcp::client::TcpClient};
use embassy_time::{Duration, Instant};
use epaper_month_calendar::{EventPage, EventSource};
use log::{debug, info, warn};
use reqwless::{
    client::HttpClient,
    request::{Method, RequestBuilder},
    response::StatusCode,
};
use serde::Deserialize;

const CLIENT_ID: &str = env!("GCAL_CLIENT_ID");
const CLIENT_SECRET: &str = env!("GCAL_CLIENT_SECRET");
const REFRESH_TOKEN: &str = env!("GCAL_REFRESH_TOKEN");
/// The ID of the calendar to show, `primary` for the account's main calendar
const CALENDAR_ID: &str = env!("GCAL_CALENDAR_ID");

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const EVENTS_URL: &str = "https://www.googleapis.com/calendar/v3/calendars";

/// Events per page, small enough for a page to fit the receive buffer
const PAGE_SIZE: u32 = 25;
/// Only the fields the counter reads
const FIELDS: &str = "items(start,end),nextPageToken";

/// Refresh the access token this long before Google says it expires
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

pub type HttpClientConcrete<'a> = HttpClient<'a, TcpClient<'a, 1, 4096, 4096>, DnsSocket<'a>>;

#[derive(Debug)]
pub enum GcalError {
    Http(reqwless::Error),
    Status(u16),
    Decode(serde_json::Error),
    /// The access token was refused even right after a refresh
    Unauthorized,
}

impl From<reqwless::Error> for GcalError {
    fn from(e: reqwless::Error) -> Self {
        Self::Http(e)
    }
}

impl From<serde_json::Error> for GcalError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e)
    }
}

impl fmt::Display for GcalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http error: {e:?}"),
            Self::Status(code) => write!(f, "unexpected status code {code}"),
            Self::Decode(e) => write!(f, "invalid response: {e}"),
            Self::Unauthorized => write!(f, "access token refused"),
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct AccessToken {
    bearer: String,
    expires_at: Instant,
}

pub struct GoogleCalendarSource<'a, 'c> {
    client: &'c mut HttpClientConcrete<'a>,
    rx_buf: &'c mut [u8],
    token: Option<AccessToken>,
}

impl<'a, 'c> GoogleCalendarSource<'a, 'c> {
    pub fn new(client: &'c mut HttpClientConcrete<'a>, rx_buf: &'c mut [u8]) -> Self {
        Self {
            client,
            rx_buf,
            token: None,
        }
    }

    async fn refresh_token(&mut self) -> Result<String, GcalError> {
        info!("Refreshing Google access token");
        let body = format!(
            "client_id={}&client_secret={}&refresh_token={}&grant_type=refresh_token",
            Encoded(CLIENT_ID),
            Encoded(CLIENT_SECRET),
            Encoded(REFRESH_TOKEN),
        );
        let headers = [("Content-Type", "application/x-www-form-urlencoded")];
        let mut request = self
            .client
            .request(Method::POST, TOKEN_URL)
            .await?
            .headers(&headers)
            .body(body.as_bytes());
        let response = request.send(&mut *self.rx_buf).await?;

        match response.status {
            StatusCode(200) => {
                let body = response.body().read_to_end().await?;
                let token: TokenResponse = serde_json::from_slice(body)?;
                let lifetime = Duration::from_secs(token.expires_in);
                let bearer = format!("Bearer {}", token.access_token);
                self.token = Some(AccessToken {
                    bearer: bearer.clone(),
                    expires_at: Instant::now() + lifetime - EXPIRY_MARGIN.min(lifetime),
                });
                Ok(bearer)
            }
            StatusCode(code) => {
                warn!("Token refresh failed with status {code}");
                Err(GcalError::Status(code))
            }
        }
    }

    async fn bearer(&mut self) -> Result<String, GcalError> {
        if let Some(token) = &self.token {
            if Instant::now() < token.expires_at {
                return Ok(token.bearer.clone());
            }
        }
        self.refresh_token().await
    }

    async fn get_page(&mut self, url: &str) -> Result<EventPage, GcalError> {
        let bearer = self.bearer().await?;
        let headers = [("Authorization", bearer.as_str())];
        let mut request = self
            .client
            .request(Method::GET, url)
            .await?
            .headers(&headers);
        let response = request.send(&mut *self.rx_buf).await?;

        match response.status {
            StatusCode(200) => {
                let body = response.body().read_to_end().await?;
                Ok(serde_json::from_slice(body)?)
            }
            StatusCode(401) => Err(GcalError::Unauthorized),
            StatusCode(code) => {
                warn!("Unexpected status code: {code}");
                Err(GcalError::Status(code))
            }
        }
    }
}

impl EventSource for GoogleCalendarSource<'_, '_> {
    type Error = GcalError;

    async fn list_events(
        &mut self,
        time_min: &DateTime<FixedOffset>,
        time_max: &DateTime<FixedOffset>,
        page_token: Option<&str>,
    ) -> Result<EventPage, Self::Error> {
        let mut url = format!(
            "{EVENTS_URL}/{}/events?timeMin={}&timeMax={}&singleEvents=true&maxResults={PAGE_SIZE}&fields={}",
            Encoded(CALENDAR_ID),
            Encoded(&time_min.to_rfc3339()),
            Encoded(&time_max.to_rfc3339()),
            Encoded(FIELDS),
        );
        if let Some(page_token) = page_token {
            url.push_str(&format!("&pageToken={}", Encoded(page_token)));
        }
        debug!("GET {url}");

        match self.get_page(&url).await {
            Err(GcalError::Unauthorized) => {
                warn!("Access token refused, retrying with a new one");
                self.token = None;
                self.get_page(&url).await
            }
            res => res,
        }
    }
}

/// Percent-encodes everything but unreserved characters
struct Encoded<'a>(&'a str);

impl fmt::Display for Encoded<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "%{byte:02X}")?;
            }
        }
        Ok(())
    }
}
