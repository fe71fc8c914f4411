//! Resource schemas for the m3ter billing API.
//!
//! Every entity the API exposes over CRUD endpoints is a plain serde struct
//! implementing [`Resource`]:
//!
//! - **Catalog**: `Product`, `Meter`, `Aggregation`, `CompoundAggregation`
//! - **Plans**: `PlanTemplate`, `PlanGroup`, `PlanGroupLink`, `Plan`, `Pricing`
//! - **Accounts**: `Account`, `AccountPlan`, `Contract`, `Commitment`, `CreditType`, `Credit`
//! - **Billing**: `Bill`, `BillJob`
//! - **Organization**: `OrganizationConfig`, `ExternalMapping`, `Alert`
//!
//! Measurements are not a CRUD resource; they are submitted in batches to the
//! ingest host (see [`usage`]).
//!
//! # Wire format
//!
//! Field names are camelCase on the wire. Optional attributes are omitted from
//! request bodies when unset, so a struct built with `..Default::default()`
//! only sends what the caller filled in.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

#[macro_use]
mod resource;

pub mod account;
pub mod bill;
pub mod catalog;
pub mod organization;
pub mod plan;
pub mod usage;

pub use account::{Account, AccountPlan, Address, Commitment, Contract, Credit, CreditType};
pub use bill::{BandUsage, Bill, BillJob, LineItem};
pub use catalog::{Aggregation, CompoundAggregation, DataField, DerivedField, Meter, Product};
pub use organization::{Alert, ExternalMapping, OrganizationConfig};
pub use plan::{Plan, PlanGroup, PlanGroupLink, PlanTemplate, Pricing, PricingBand};
pub use resource::{Page, Resource};
pub use usage::{Measurement, MeasurementBatch};
