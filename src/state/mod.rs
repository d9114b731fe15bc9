pub mod clock;
pub mod ledger;
pub mod note;
