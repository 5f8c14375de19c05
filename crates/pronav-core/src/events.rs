//! Events emitted by the simulation during a frame.

use serde::{Deserialize, Serialize};

use crate::enums::ExpiryReason;
use crate::types::Vec2;

/// Something worth telling the presentation layer about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    TargetSpawned { id: u64 },
    MissileLaunched { id: u64, target_id: u64 },
    /// Guidance detected a miss; the missile keeps flying unless
    /// expire-on-miss is enabled.
    MissileMissed { id: u64, miss_count: u32 },
    MissileExpired { id: u64, reason: ExpiryReason },
    TargetDestroyed { id: u64, position: Vec2 },
    ExplosionSpawned { position: Vec2 },
    /// A proximity-fused round burst into a fragment ring.
    BulletDetonated { position: Vec2, fragments: usize },
}
