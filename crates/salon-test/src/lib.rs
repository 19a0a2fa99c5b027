//! Salon booking server - integration test support.
//!
//! Re-exports the workspace crates so integration tests can reach every
//! layer through `salon_test::` paths.

pub mod component {
    pub use salon_core::*;
    pub use salon_service::{appointment, availability, calendar, notify};

    pub mod db {
        pub use salon_db::db::*;

        pub mod connection {
            pub use salon_app::db_handler::DbProviderHandler;
            pub use salon_db::db::connection::*;
        }
    }

    pub mod model {
        pub use salon_db::model::*;
    }

    pub mod config {
        pub use salon_app::config::ConfigHandler;
        pub use salon_core::config::*;
    }
}

pub use salon_app::app;
pub use salon_app::notifier_handler::NotifierHandler;
