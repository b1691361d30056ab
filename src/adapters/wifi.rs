//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`] — the hexagonal boundary for network
//! connectivity.  The control loop only ever asks "connected?"; joining,
//! credential checks and reconnection all live here.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: a simulated link for host-side tests.
//!
//! ## Reconnection policy
//!
//! Association is started, never awaited: [`WifiAdapter::connect`] and each
//! retry only kick off the join, and [`WifiAdapter::poll`] checks the link on
//! later loop iterations.  An attempt that has not come up within
//! [`CONNECT_TIMEOUT_SECS`] is abandoned.  Failed attempts wait an
//! exponential backoff (2 s → 4 s → 8 s … capped at 60 s) before retrying.
//! The control loop is never held up by the radio.

use core::fmt;

use embassy_time::{Duration, Instant};
use log::{error, info, warn};

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};

use crate::app::ports::ConnectivityPort;

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
    AlreadyConnected,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
            Self::AlreadyConnected => write!(f, "already connected to AP"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    /// Join issued; waiting for the link to come up.
    Connecting,
    Connected,
    /// `attempt` failed retries so far; waiting out the backoff.
    Reconnecting { attempt: u32 },
}

const INITIAL_BACKOFF_SECS: u64 = 2;
const MAX_BACKOFF_SECS: u64 = 60;
/// How long one join may take before it is abandoned.
pub const CONNECT_TIMEOUT_SECS: u64 = 15;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

pub fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(ConnectivityError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    backoff_secs: u64,
    /// Failed retries behind the current attempt.
    attempt: u32,
    next_attempt: Instant,
    connect_deadline: Instant,
    #[cfg(target_os = "espidf")]
    driver: Option<EspWifi<'static>>,
    #[cfg(not(target_os = "espidf"))]
    sim: SimLink,
}

/// Host-side stand-in for the radio.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
struct SimLink {
    up: bool,
    joining: bool,
    /// Polls a successful join takes before the link is up.
    join_polls: u32,
    polls_left: u32,
    fail_next: u32,
    connects: u32,
}

impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl WifiAdapter {
    pub fn new() -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            backoff_secs: INITIAL_BACKOFF_SECS,
            attempt: 0,
            next_attempt: Instant::from_ticks(0),
            connect_deadline: Instant::from_ticks(0),
            #[cfg(target_os = "espidf")]
            driver: None,
            #[cfg(not(target_os = "espidf"))]
            sim: SimLink::default(),
        }
    }

    /// Hand the adapter an ESP-IDF WiFi driver.
    #[cfg(target_os = "espidf")]
    pub fn attach_driver(&mut self, driver: EspWifi<'static>) {
        self.driver = Some(driver);
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_secs(self.backoff_secs)
    }

    pub fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid.push_str(ssid).map_err(|_| ConnectivityError::InvalidSsid)?;
        self.password.clear();
        self.password.push_str(password).map_err(|_| ConnectivityError::InvalidPassword)?;
        info!("WiFi: credentials updated (SSID='{}')", self.ssid);
        Ok(())
    }

    /// Start joining the configured network and return immediately.
    ///
    /// `Ok` means the join was issued; [`poll`](Self::poll) finishes it.  If
    /// it cannot even be issued the adapter enters `Reconnecting`.
    pub fn connect(&mut self, now: Instant) -> Result<(), ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        if self.state == WifiState::Connected {
            return Err(ConnectivityError::AlreadyConnected);
        }

        info!("WiFi: connecting to '{}'", self.ssid);
        self.attempt = 0;
        self.backoff_secs = INITIAL_BACKOFF_SECS;
        self.begin_attempt(now).inspect_err(|e| error!("WiFi: connection failed: {}", e))
    }

    pub fn disconnect(&mut self) {
        self.platform_disconnect();
        self.state = WifiState::Disconnected;
        info!("WiFi: disconnected");
    }

    /// Drive association and reconnection.  Call from the main loop between
    /// cycles; never waits on the radio.
    pub fn poll(&mut self, now: Instant) {
        match self.state {
            WifiState::Connecting => {
                if self.platform_poll_link() {
                    self.on_connected();
                    info!("WiFi: connected");
                } else if now >= self.connect_deadline {
                    warn!("WiFi: join timed out after {}s", CONNECT_TIMEOUT_SECS);
                    self.platform_disconnect();
                    self.fail_attempt(now);
                }
            }
            WifiState::Reconnecting { attempt } => {
                if now < self.next_attempt {
                    return;
                }
                info!("WiFi: reconnect attempt {} (backoff {}s)", attempt + 1, self.backoff_secs);
                self.attempt = attempt + 1;
                let _ = self.begin_attempt(now);
            }
            WifiState::Connected => {
                if !self.platform_is_connected() {
                    warn!("WiFi: connection lost, entering reconnect");
                    self.attempt = 0;
                    self.backoff_secs = INITIAL_BACKOFF_SECS;
                    self.schedule_retry(now);
                }
            }
            WifiState::Disconnected => {}
        }
    }

    fn begin_attempt(&mut self, now: Instant) -> Result<(), ConnectivityError> {
        match self.platform_begin_connect() {
            Ok(()) => {
                self.state = WifiState::Connecting;
                self.connect_deadline = now + Duration::from_secs(CONNECT_TIMEOUT_SECS);
                Ok(())
            }
            Err(e) => {
                self.fail_attempt(now);
                Err(e)
            }
        }
    }

    fn fail_attempt(&mut self, now: Instant) {
        if self.attempt > 0 {
            self.backoff_secs = (self.backoff_secs * 2).min(MAX_BACKOFF_SECS);
        }
        self.schedule_retry(now);
    }

    fn on_connected(&mut self) {
        self.state = WifiState::Connected;
        self.attempt = 0;
        self.backoff_secs = INITIAL_BACKOFF_SECS;
    }

    fn schedule_retry(&mut self, now: Instant) {
        self.state = WifiState::Reconnecting { attempt: self.attempt };
        self.next_attempt = now + self.backoff();
    }

    // ── Platform-specific ─────────────────────────────────────

    /// Configure, start (if needed) and issue the association request.
    /// `EspWifi::connect` returns once the request is queued.
    #[cfg(target_os = "espidf")]
    fn platform_begin_connect(&mut self) -> Result<(), ConnectivityError> {
        let Some(wifi) = self.driver.as_mut() else {
            warn!("WiFi(espidf): no driver attached");
            return Err(ConnectivityError::ConnectionFailed);
        };

        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let client = ClientConfiguration {
            ssid: self
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        };

        issue_join(wifi, &Configuration::Client(client)).map_err(|e| {
            warn!("WiFi(espidf): {}", e);
            ConnectivityError::ConnectionFailed
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_begin_connect(&mut self) -> Result<(), ConnectivityError> {
        self.sim.connects += 1;
        self.sim.up = false;
        if self.sim.fail_next > 0 {
            self.sim.fail_next -= 1;
            self.sim.joining = false;
            warn!("WiFi(sim): AP will not answer (attempt {})", self.sim.connects);
        } else {
            self.sim.joining = true;
            self.sim.polls_left = self.sim.join_polls;
        }
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_poll_link(&mut self) -> bool {
        self.platform_is_connected()
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_poll_link(&mut self) -> bool {
        if self.sim.joining {
            if self.sim.polls_left == 0 {
                self.sim.joining = false;
                self.sim.up = true;
                info!("WiFi(sim): associated with '{}' (attempt {})", self.ssid, self.sim.connects);
            } else {
                self.sim.polls_left -= 1;
            }
        }
        self.sim.up
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        if let Some(wifi) = self.driver.as_mut() {
            if let Err(e) = wifi.disconnect() {
                warn!("WiFi(espidf): disconnect failed: {}", e);
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        self.sim.up = false;
        self.sim.joining = false;
        info!("WiFi(sim): disconnected");
    }

    /// Associated and the station netif has an address.
    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.driver
            .as_ref()
            .is_some_and(|wifi| wifi.is_up().unwrap_or(false))
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.sim.up
    }

    // ── Simulation controls ───────────────────────────────────

    /// Simulate the AP going away.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_drop_link(&mut self) {
        self.sim.up = false;
    }

    /// Make the next `n` joins hang until they time out.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_next(&mut self, n: u32) {
        self.sim.fail_next = n;
    }

    /// Make successful joins take `polls` extra polls to come up.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_join_after(&mut self, polls: u32) {
        self.sim.join_polls = polls;
    }
}

/// Apply the client config, start the driver if needed and queue the join.
#[cfg(target_os = "espidf")]
fn issue_join(
    wifi: &mut EspWifi<'static>,
    config: &Configuration,
) -> Result<(), esp_idf_svc::sys::EspError> {
    wifi.set_configuration(config)?;
    if !wifi.is_started()? {
        wifi.start()?;
    }
    wifi.connect()
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn is_connected(&self) -> bool {
        self.state == WifiState::Connected && self.platform_is_connected()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
