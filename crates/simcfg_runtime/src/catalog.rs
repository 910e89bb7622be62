//! The built-in entity types of the `simcfg` binary.

use simcfg_storage::{InputSpec, TypeRegistry, ValueKind};

fn description() -> InputSpec {
    InputSpec::new("Description", ValueKind::list())
}

/// Registers the standard queueing types:
///
/// - `Region` - a namespace for other entities
/// - `Queue` - a waiting line with a capacity and priority
/// - `Server` - serves entities from a queue
/// - `Statistics` - collects named quantities over time
///
/// `Processor` and `WaitingLine` are accepted as deprecated names.
#[must_use]
pub fn standard_types() -> TypeRegistry {
    let mut registry = TypeRegistry::new();

    registry.register("Region", || {
        vec![
            description(),
            InputSpec::new("Active", ValueKind::Boolean).with_default("TRUE"),
        ]
    });

    registry.register("Queue", || {
        vec![
            description(),
            InputSpec::new("Capacity", ValueKind::Integer { min: 0, max: i64::MAX })
                .with_default("10000"),
            InputSpec::new("Priority", ValueKind::integer()).with_default("0"),
        ]
    });

    registry.register("Server", || {
        vec![
            description(),
            InputSpec::new("ServiceTime", ValueKind::non_negative()).with_default("0 s"),
            InputSpec::new("WaitQueue", ValueKind::Entity),
            InputSpec::new("Active", ValueKind::Boolean).with_default("TRUE"),
            InputSpec::new("StateList", ValueKind::list()).appendable(),
        ]
    });

    registry.register("Statistics", || {
        vec![
            description(),
            InputSpec::new("Interval", ValueKind::non_negative()).with_default("1 h"),
            InputSpec::new("Quantities", ValueKind::List { min: 1, max: usize::MAX }).appendable(),
        ]
    });

    registry.register_alias("Processor", "Server");
    registry.register_alias("WaitingLine", "Queue");
    registry
}
