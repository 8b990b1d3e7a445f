pub mod confirm;
pub mod delete_service;
pub mod id_listing_service;

pub use confirm::{is_affirmative, AssumeYes, Confirmer, StdinConfirmer};
pub use delete_service::{DeleteError, DeleteEvent, DeleteOutcome, DeleteService};
pub use id_listing_service::{render_ids, IdListingService};
