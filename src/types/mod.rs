//! Shared data structures for the reservoir analytics engine
//!
//! Callers hand a populated model to the engine and get the same struct back
//! with its derived fields filled in:
//! - `DeclineModel`: Arps parameters → EUR, remaining life, snapshots
//! - `IprModel`: one well test → J, qmax, curve, operating point
//! - `MaterialBalanceStudy`: PVT/production history → OOIP, drive indices
//! - `FluidDescription` / `PvtSample`: correlation inputs and lab checks
//!
//! Derived fields are grouped in a single `Option` per model so they are
//! either entirely present or entirely absent.

mod decline;
mod ipr;
mod material_balance;
mod pvt;
mod regression;

pub use decline::*;
pub use ipr::*;
pub use material_balance::*;
pub use pvt::*;
pub use regression::*;
