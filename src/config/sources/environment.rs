//! Environment source: LSTREE_ prefix, `__` between nested keys (LSTREE_WALK__STRICT=true)

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("LSTREE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}
