//! # szamla-agent
//!
//! Client SDK for the [Számlázz.hu](https://www.szamlazz.hu) Számla Agent
//! web service: invoices, proformas, delivery notes, receipts and NAV
//! tax-payer lookups over the Agent multipart XML protocol.
//!
//! One call follows one path: the document graph is validated field by
//! field, serialized into the operation's XML schema, framed as a multipart
//! upload with session continuity, and the reply — header-carried text,
//! wrapped XML or NAV tax-payer XML — is normalized into a typed outcome.
//!
//! ## Quick Start
//!
//! ```no_run
//! use szamla_agent::{Agent, Settings};
//! use szamla_agent::document::{Buyer, Invoice, InvoiceHeader, Item, Seller};
//!
//! let settings = Settings::with_api_key("szamlaagentkulcs-from-your-account");
//! let agent = Agent::new(settings)?;
//!
//! let mut header = InvoiceHeader::invoice();
//! header.payment_method = "átutalás".into();
//! header.currency = "HUF".into();
//! header.language = "hu".into();
//!
//! let invoice = Invoice {
//!     header,
//!     seller: Seller::default(),
//!     buyer: Buyer::new("Kovács Bt.", "2030", "Érd", "Tárnoki út 23."),
//!     items: vec![Item::new("Eladó tétel", 1.0, "db", 10000.0, "27")],
//!     ..Invoice::default()
//! };
//!
//! let outcome = agent.generate_invoice(&invoice)?;
//! println!("invoice number: {:?}", outcome.invoice_number);
//! # Ok::<(), szamla_agent::AgentError>(())
//! ```

pub mod client;
pub mod core;
pub mod document;
pub mod response;
pub mod schema;
pub mod session;
pub mod transport;
pub mod wire;

pub use crate::client::{Agent, AgentConfig, ResponseVersion};
pub use crate::core::{AgentError, DocumentKind, Operation, WireMap, WireNode};
pub use crate::document::Settings;
pub use crate::response::Outcome;
