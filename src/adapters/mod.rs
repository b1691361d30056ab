//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to              |
//! |----------------|--------------------|--------------------------|
//! | `hardware`     | RangingPort        | HC-SR04 on GPIO          |
//! |                | ActuatorPort       | ESP32 LEDC PWM, GPIO     |
//! | `log_delivery` | DeliveryPort       | Serial log (JSON)        |
//! | `log_sink`     | EventSink          | Serial log output        |
//! | `time`         | ClockPort          | ESP32 system timer       |
//! | `wifi`         | ConnectivityPort   | ESP-IDF WiFi STA         |

pub mod hardware;
pub mod log_delivery;
pub mod log_sink;
pub mod time;
pub mod wifi;
