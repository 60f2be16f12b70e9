#![cfg(feature = "bevy")]

use bevy::prelude::*;

use crate::EcosortConfig;

pub trait AppEcosortConfigExt {
    /// Inserts every config section as its own resource so systems can
    /// depend on exactly the section they read.
    fn use_ecosort_config(self, config: EcosortConfig) -> Self;
}

impl AppEcosortConfigExt for App {
    fn use_ecosort_config(mut self, config: EcosortConfig) -> Self {
        self.insert_resource(config.general)
            .insert_resource(config.simulation)
            .insert_resource(config.location);
        self
    }
}
