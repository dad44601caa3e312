use crate::foundation::ids::NodeIdx;
use crate::scene::model::SceneGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named skeletal role of a humanoid rig bone.
///
/// Each role maps to at most one node per skeleton. The enumeration mirrors
/// the host-engine humanoid layout: torso and head, limbs, toes, eyes, jaw,
/// and three-segment fingers on both hands.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BoneRole {
    /// Pelvis root of the skeleton.
    Hips,
    /// Left upper leg (thigh).
    LeftUpperLeg,
    /// Right upper leg (thigh).
    RightUpperLeg,
    /// Left lower leg (shin).
    LeftLowerLeg,
    /// Right lower leg (shin).
    RightLowerLeg,
    /// Left foot.
    LeftFoot,
    /// Right foot.
    RightFoot,
    /// Lower spine.
    Spine,
    /// Chest.
    Chest,
    /// Upper chest, between chest and neck.
    UpperChest,
    /// Neck.
    Neck,
    /// Head.
    Head,
    /// Left shoulder (clavicle).
    LeftShoulder,
    /// Right shoulder (clavicle).
    RightShoulder,
    /// Left upper arm.
    LeftUpperArm,
    /// Right upper arm.
    RightUpperArm,
    /// Left lower arm (forearm).
    LeftLowerArm,
    /// Right lower arm (forearm).
    RightLowerArm,
    /// Left hand (wrist).
    LeftHand,
    /// Right hand (wrist).
    RightHand,
    /// Left toes.
    LeftToes,
    /// Right toes.
    RightToes,
    /// Left eye.
    LeftEye,
    /// Right eye.
    RightEye,
    /// Jaw.
    Jaw,
    /// Left thumb, proximal segment.
    LeftThumbProximal,
    /// Left thumb, intermediate segment.
    LeftThumbIntermediate,
    /// Left thumb, distal segment.
    LeftThumbDistal,
    /// Left index finger, proximal segment.
    LeftIndexProximal,
    /// Left index finger, intermediate segment.
    LeftIndexIntermediate,
    /// Left index finger, distal segment.
    LeftIndexDistal,
    /// Left middle finger, proximal segment.
    LeftMiddleProximal,
    /// Left middle finger, intermediate segment.
    LeftMiddleIntermediate,
    /// Left middle finger, distal segment.
    LeftMiddleDistal,
    /// Left ring finger, proximal segment.
    LeftRingProximal,
    /// Left ring finger, intermediate segment.
    LeftRingIntermediate,
    /// Left ring finger, distal segment.
    LeftRingDistal,
    /// Left little finger, proximal segment.
    LeftLittleProximal,
    /// Left little finger, intermediate segment.
    LeftLittleIntermediate,
    /// Left little finger, distal segment.
    LeftLittleDistal,
    /// Right thumb, proximal segment.
    RightThumbProximal,
    /// Right thumb, intermediate segment.
    RightThumbIntermediate,
    /// Right thumb, distal segment.
    RightThumbDistal,
    /// Right index finger, proximal segment.
    RightIndexProximal,
    /// Right index finger, intermediate segment.
    RightIndexIntermediate,
    /// Right index finger, distal segment.
    RightIndexDistal,
    /// Right middle finger, proximal segment.
    RightMiddleProximal,
    /// Right middle finger, intermediate segment.
    RightMiddleIntermediate,
    /// Right middle finger, distal segment.
    RightMiddleDistal,
    /// Right ring finger, proximal segment.
    RightRingProximal,
    /// Right ring finger, intermediate segment.
    RightRingIntermediate,
    /// Right ring finger, distal segment.
    RightRingDistal,
    /// Right little finger, proximal segment.
    RightLittleProximal,
    /// Right little finger, intermediate segment.
    RightLittleIntermediate,
    /// Right little finger, distal segment.
    RightLittleDistal,
}

impl BoneRole {
    /// Every role in declaration order.
    pub const ALL: [BoneRole; 55] = [
        BoneRole::Hips,
        BoneRole::LeftUpperLeg,
        BoneRole::RightUpperLeg,
        BoneRole::LeftLowerLeg,
        BoneRole::RightLowerLeg,
        BoneRole::LeftFoot,
        BoneRole::RightFoot,
        BoneRole::Spine,
        BoneRole::Chest,
        BoneRole::UpperChest,
        BoneRole::Neck,
        BoneRole::Head,
        BoneRole::LeftShoulder,
        BoneRole::RightShoulder,
        BoneRole::LeftUpperArm,
        BoneRole::RightUpperArm,
        BoneRole::LeftLowerArm,
        BoneRole::RightLowerArm,
        BoneRole::LeftHand,
        BoneRole::RightHand,
        BoneRole::LeftToes,
        BoneRole::RightToes,
        BoneRole::LeftEye,
        BoneRole::RightEye,
        BoneRole::Jaw,
        BoneRole::LeftThumbProximal,
        BoneRole::LeftThumbIntermediate,
        BoneRole::LeftThumbDistal,
        BoneRole::LeftIndexProximal,
        BoneRole::LeftIndexIntermediate,
        BoneRole::LeftIndexDistal,
        BoneRole::LeftMiddleProximal,
        BoneRole::LeftMiddleIntermediate,
        BoneRole::LeftMiddleDistal,
        BoneRole::LeftRingProximal,
        BoneRole::LeftRingIntermediate,
        BoneRole::LeftRingDistal,
        BoneRole::LeftLittleProximal,
        BoneRole::LeftLittleIntermediate,
        BoneRole::LeftLittleDistal,
        BoneRole::RightThumbProximal,
        BoneRole::RightThumbIntermediate,
        BoneRole::RightThumbDistal,
        BoneRole::RightIndexProximal,
        BoneRole::RightIndexIntermediate,
        BoneRole::RightIndexDistal,
        BoneRole::RightMiddleProximal,
        BoneRole::RightMiddleIntermediate,
        BoneRole::RightMiddleDistal,
        BoneRole::RightRingProximal,
        BoneRole::RightRingIntermediate,
        BoneRole::RightRingDistal,
        BoneRole::RightLittleProximal,
        BoneRole::RightLittleIntermediate,
        BoneRole::RightLittleDistal,
    ];

    /// Roles that must be mapped for a rig to count as a valid humanoid.
    pub const REQUIRED: [BoneRole; 15] = [
        BoneRole::Hips,
        BoneRole::Spine,
        BoneRole::Head,
        BoneRole::LeftUpperLeg,
        BoneRole::RightUpperLeg,
        BoneRole::LeftLowerLeg,
        BoneRole::RightLowerLeg,
        BoneRole::LeftFoot,
        BoneRole::RightFoot,
        BoneRole::LeftUpperArm,
        BoneRole::RightUpperArm,
        BoneRole::LeftLowerArm,
        BoneRole::RightLowerArm,
        BoneRole::LeftHand,
        BoneRole::RightHand,
    ];

    /// True for roles that must be present on every humanoid rig.
    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }

    /// True for limb-chain roles subject to rest-pose rotation baking.
    pub fn is_limb(self) -> bool {
        matches!(
            self,
            BoneRole::LeftShoulder
                | BoneRole::RightShoulder
                | BoneRole::LeftUpperArm
                | BoneRole::RightUpperArm
                | BoneRole::LeftLowerArm
                | BoneRole::RightLowerArm
                | BoneRole::LeftHand
                | BoneRole::RightHand
                | BoneRole::LeftUpperLeg
                | BoneRole::RightUpperLeg
                | BoneRole::LeftLowerLeg
                | BoneRole::RightLowerLeg
                | BoneRole::LeftFoot
                | BoneRole::RightFoot
        )
    }
}

/// Resolved role -> node mapping for one skeleton.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BoneTable {
    entries: BTreeMap<BoneRole, NodeIdx>,
}

impl BoneTable {
    /// Scan `graph` and build the role table.
    ///
    /// The first node found for a role wins; any further node claiming the
    /// same role is returned in the duplicate list as
    /// `(role, kept, ignored)`.
    pub fn resolve(graph: &SceneGraph) -> (Self, Vec<(BoneRole, NodeIdx, NodeIdx)>) {
        let mut table = Self::default();
        let mut duplicates = Vec::new();
        for (idx, node) in graph.iter() {
            let Some(role) = node.role else {
                continue;
            };
            match table.entries.get(&role) {
                Some(&kept) => duplicates.push((role, kept, idx)),
                None => {
                    table.entries.insert(role, idx);
                }
            }
        }
        (table, duplicates)
    }

    /// Node mapped to `role`, if any.
    pub fn get(&self, role: BoneRole) -> Option<NodeIdx> {
        self.entries.get(&role).copied()
    }

    /// Number of mapped roles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no roles are mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate mapped `(role, node)` pairs in role order.
    pub fn iter(&self) -> impl Iterator<Item = (BoneRole, NodeIdx)> + '_ {
        self.entries.iter().map(|(&r, &i)| (r, i))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/bones.rs"]
mod tests;
