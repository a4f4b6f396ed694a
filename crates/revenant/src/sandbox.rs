//! Toy engine objects.

use revenant_core::{EntityTemplate, PooledInstance};
use revenant_shared::{Placement, Vec3};

/// Manifest used when no file is given.
pub const DEFAULT_MANIFEST: &str = r#"
log_level = "warnings_and_errors"

[[pool]]
name = "bullet"
template = "bullet"
initial_size = 64
fixed_size = true

[[pool]]
name = "spark"
template = "spark"
initial_size = 16
max_idle = 32

[[pool]]
name = "enemy"
template = "grunt"
initial_size = 8
"#;

/// What a sprite looks like and how it moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    /// Fast, short-lived projectile.
    Bullet,
    /// Slow cosmetic effect.
    Spark,
    /// Walking enemy.
    Grunt,
}

impl SpriteKind {
    /// Units per frame along the facing axis.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Bullet => 1.5,
            Self::Spark => 0.1,
            Self::Grunt => 0.05,
        }
    }
}

/// A pooled sprite.
#[derive(Clone, Debug)]
pub struct Sprite {
    /// Kind, fixed at manufacture.
    pub kind: SpriteKind,
    /// Current placement.
    pub placement: Placement,
    /// Shown and simulated.
    pub visible: bool,
    /// How many times it has been spawned.
    pub spawns: u32,
}

impl Sprite {
    /// Moves the sprite one frame forward.
    pub fn advance(&mut self) {
        self.placement.position += Vec3::X * self.kind.speed();
    }
}

impl PooledInstance for Sprite {
    fn set_active(&mut self, active: bool) {
        if active {
            self.spawns += 1;
        }
        self.visible = active;
    }

    fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }
}

/// Manufactures sprites of one kind.
#[derive(Clone, Copy, Debug)]
pub struct SpriteTemplate {
    kind: SpriteKind,
}

impl SpriteTemplate {
    /// Template for `kind`.
    #[must_use]
    pub const fn new(kind: SpriteKind) -> Self {
        Self { kind }
    }
}

impl EntityTemplate for SpriteTemplate {
    type Instance = Sprite;

    fn manufacture(&self) -> Sprite {
        Sprite {
            kind: self.kind,
            placement: Placement::IDENTITY,
            visible: true,
            spawns: 0,
        }
    }
}

/// Resolves manifest template keys.
#[must_use]
pub fn catalog(key: &str) -> Option<SpriteTemplate> {
    let kind = match key {
        "bullet" => SpriteKind::Bullet,
        "spark" => SpriteKind::Spark,
        "grunt" => SpriteKind::Grunt,
        _ => return None,
    };
    Some(SpriteTemplate::new(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use revenant_core::PoolManifest;

    #[test]
    fn test_default_manifest_resolves() {
        let manifest = PoolManifest::from_toml_str(DEFAULT_MANIFEST).unwrap();
        let descriptors = manifest.resolve(catalog).unwrap();
        assert_eq!(descriptors.len(), 3);
        assert_eq!(descriptors[2].template.kind, SpriteKind::Grunt);
    }

    #[test]
    fn test_unknown_key() {
        assert!(catalog("dragon").is_none());
    }

    #[test]
    fn test_advance_moves_along_x() {
        let mut sprite = SpriteTemplate::new(SpriteKind::Bullet).manufacture();
        sprite.advance();
        sprite.advance();
        assert_eq!(sprite.placement.position, Vec3::new(3.0, 0.0, 0.0));
    }
}
