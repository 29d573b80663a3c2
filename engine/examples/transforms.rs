//! Creates a hundred entities, doubles a value through a view twice, then destroys and
//! recreates entities to show id recycling.
//!
//! Run with `RUST_LOG=debug cargo run --example transforms` to see the registry's logging.

use rusty_ecs::ecs::{Component, EcsError, Registry};

#[derive(Component, Debug, Default)]
struct Transform {
    val: i32,
}

fn main() -> Result<(), EcsError> {
    env_logger::init();

    let mut registry = Registry::new();
    registry.register::<Transform>(100)?;

    let entities = registry.create_many(100);
    for (i, &entity) in entities.iter().enumerate() {
        registry.emplace::<Transform>(entity)?.val = i as i32;
    }

    let mut view = registry.view::<&mut Transform>();
    for _ in 0..2 {
        for (_, transform) in view.iter() {
            transform.val *= 2;
        }
    }
    for (entity, transform) in view.iter() {
        println!("{entity}: {}", transform.val);
    }

    registry.destroy(entities[5]);
    let reused = registry.create();
    let fresh = registry.create();
    println!("reused id: {reused}, fresh id: {fresh}");
    println!(
        "{reused} has transform: {}, live entities: {}",
        registry.has::<Transform>(reused),
        registry.len()
    );

    Ok(())
}
