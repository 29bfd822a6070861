//! HTTP client for the EVE-NG REST API.
//!
//! The session lifecycle is encoded in the types: [`EveClient::new`]
//! validates connection parameters offline, [`EveClient::login`] consumes
//! the client and returns the authenticated [`EveSession`], and every data
//! call lives on the session. [`EveSession::logout`] consumes the session
//! again. Holding an `EveSession` therefore always means login succeeded.
//!
//! ```no_run
//! use eveprobe_api::EveClient;
//! use eveprobe_config::{ConnectionConfig, Protocol};
//!
//! # async fn probe() -> eveprobe_core::Result<()> {
//! let connection = ConnectionConfig {
//!     hostname: "eve.example.com".to_string(),
//!     username: "admin".to_string(),
//!     password: "eve".to_string(),
//!     protocol: Protocol::Https,
//!     port: None,
//! };
//! let session = EveClient::new(&connection)?.login().await?;
//! let status = session.subsystem_status().await?;
//! println!("qemu instances: {:?}", status.qemu);
//! session.logout().await?;
//! # Ok(())
//! # }
//! ```

mod catalog;
mod inspector;
mod session;
mod status;
mod transport;

pub use session::{EveClient, EveSession};
