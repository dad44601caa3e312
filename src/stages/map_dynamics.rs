use crate::foundation::ids::NodeIdx;
use crate::pipeline::context::ExportContext;
use crate::pipeline::notify::{Notification, StageReport};
use crate::pipeline::stage::Stage;
use crate::scene::dynamics::{FieldValue, LooseComponent, SpringBoneGroup};
use crate::scene::model::SceneGraph;
use glam::Vec3;

/// Stage id of [`MapDynamics`].
pub const ID: &str = "map_dynamics";

/// Unify the three secondary-motion schemas into normalized spring chains.
///
/// The native spring-bone component copies through unchanged. The two
/// third-party component types are optional external packages: they are
/// located by fully-qualified type name and their fields read by name, so
/// the stage behaves identically whether or not those packages exist in the
/// host environment; absence simply yields zero detections. Every
/// third-party detection is disclosed as approximate, because the
/// underlying physics models are not equivalent; that warning is a permanent
/// property of the conversion, not a defect to silence.
pub struct MapDynamics;

/// Capability probe for one third-party component schema.
trait SchemaProbe {
    /// Fully-qualified type name the probe binds to.
    fn type_name(&self) -> &'static str;

    /// Short label used in diagnostics.
    fn label(&self) -> &'static str;

    /// Translate one component into the normalized parameter set.
    ///
    /// Malformed fields are recorded in `faults` and fall back to the
    /// schema's defaults; translation itself never fails.
    fn convert(
        &self,
        comp: &LooseComponent,
        host: NodeIdx,
        graph: &SceneGraph,
        faults: &mut Vec<String>,
    ) -> SpringBoneGroup;
}

fn read_float(comp: &LooseComponent, name: &str, default: f32, faults: &mut Vec<String>) -> f32 {
    match comp.field(name) {
        None => default,
        Some(FieldValue::Float(v)) if v.is_finite() => *v,
        Some(other) => {
            faults.push(format!(
                "field \"{name}\" has unexpected value {other:?}; using default {default}"
            ));
            default
        }
    }
}

fn read_vec3(comp: &LooseComponent, name: &str, default: Vec3, faults: &mut Vec<String>) -> Vec3 {
    match comp.field(name) {
        None => default,
        Some(FieldValue::Vec3(v)) if v.is_finite() => *v,
        Some(other) => {
            faults.push(format!(
                "field \"{name}\" has unexpected value {other:?}; using default {default}"
            ));
            default
        }
    }
}

fn read_root(
    comp: &LooseComponent,
    name: &str,
    host: NodeIdx,
    graph: &SceneGraph,
    faults: &mut Vec<String>,
) -> NodeIdx {
    match comp.field(name) {
        None => host,
        Some(FieldValue::Node(idx)) if (idx.0 as usize) < graph.len() => *idx,
        Some(other) => {
            faults.push(format!(
                "field \"{name}\" has unexpected value {other:?}; using the host bone"
            ));
            host
        }
    }
}

/// Classic chain-dynamics package: per-chain damping/elasticity/stiffness
/// scalars and an inherent gravity force vector.
struct JiggleChainProbe;

impl SchemaProbe for JiggleChainProbe {
    fn type_name(&self) -> &'static str {
        "DynamicBone"
    }

    fn label(&self) -> &'static str {
        "chain dynamics"
    }

    fn convert(
        &self,
        comp: &LooseComponent,
        host: NodeIdx,
        graph: &SceneGraph,
        faults: &mut Vec<String>,
    ) -> SpringBoneGroup {
        let damping = read_float(comp, "m_Damping", 0.1, faults);
        let elasticity = read_float(comp, "m_Elasticity", 0.1, faults);
        let radius = read_float(comp, "m_Radius", 0.02, faults);
        let gravity = read_vec3(comp, "m_Gravity", Vec3::ZERO, faults);
        let root = read_root(comp, "m_Root", host, graph, faults);

        // The gravity force vector decomposes into magnitude + direction;
        // a zero vector keeps the canonical downward direction.
        let gravity_power = gravity.length();
        let gravity_dir = if gravity_power > 0.0 {
            gravity / gravity_power
        } else {
            Vec3::NEG_Y
        };

        SpringBoneGroup {
            source: self.label().to_owned(),
            stiffness: (elasticity * 4.0).clamp(0.0, 4.0),
            gravity_power,
            gravity_dir,
            drag_force: damping.clamp(0.0, 1.0),
            hit_radius: radius.max(0.0),
            bones: graph.descendants(root),
        }
    }
}

/// Constraint-based physics package: pull/spring scalars and a signed
/// scalar gravity along the world up axis.
struct PhysChainProbe;

impl SchemaProbe for PhysChainProbe {
    fn type_name(&self) -> &'static str {
        "VRC.SDK3.Dynamics.PhysBone.Components.VRCPhysBone"
    }

    fn label(&self) -> &'static str {
        "constraint physics"
    }

    fn convert(
        &self,
        comp: &LooseComponent,
        host: NodeIdx,
        graph: &SceneGraph,
        faults: &mut Vec<String>,
    ) -> SpringBoneGroup {
        let pull = read_float(comp, "pull", 0.2, faults);
        let spring = read_float(comp, "spring", 0.2, faults);
        let gravity = read_float(comp, "gravity", 0.0, faults);
        let radius = read_float(comp, "radius", 0.0, faults);
        let root = read_root(comp, "rootTransform", host, graph, faults);

        SpringBoneGroup {
            source: self.label().to_owned(),
            stiffness: (pull * 4.0).clamp(0.0, 4.0),
            // This schema's "spring" is springiness retained per step, so it
            // maps inversely onto drag.
            drag_force: (1.0 - spring).clamp(0.0, 1.0),
            gravity_power: gravity.abs(),
            gravity_dir: if gravity >= 0.0 { Vec3::NEG_Y } else { Vec3::Y },
            hit_radius: radius.max(0.0),
            bones: graph.descendants(root),
        }
    }
}

const PROBES: &[&dyn SchemaProbe] = &[&JiggleChainProbe, &PhysChainProbe];

impl Stage for MapDynamics {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        "Secondary-motion mapping"
    }

    fn order(&self) -> u32 {
        70
    }

    fn execute(&self, ctx: &mut ExportContext<'_>) -> StageReport {
        let mut report = StageReport::new();
        let mut groups: Vec<SpringBoneGroup> = Vec::new();

        let graph = &ctx.avatar.graph;
        for (idx, node) in graph.iter() {
            if let Some(spring) = &node.spring {
                groups.push(SpringBoneGroup {
                    source: "native spring bone".to_owned(),
                    stiffness: spring.stiffness,
                    gravity_power: spring.gravity_power,
                    gravity_dir: spring.gravity_dir,
                    drag_force: spring.drag_force,
                    hit_radius: spring.hit_radius,
                    bones: graph.descendants(idx),
                });
            }

            for comp in &node.components {
                let Some(probe) = PROBES.iter().find(|p| p.type_name() == comp.type_name) else {
                    tracing::debug!(
                        type_name = comp.type_name.as_str(),
                        node = node.name.as_str(),
                        "no probe for component type"
                    );
                    continue;
                };

                let mut faults: Vec<String> = Vec::new();
                let group = probe.convert(comp, idx, graph, &mut faults);
                for fault in faults {
                    report.push(Notification::warning(
                        ID,
                        format!("{} on \"{}\": {fault}", comp.type_name, node.name),
                    ));
                }
                report.push(Notification::warning(
                    ID,
                    format!(
                        "{} component on \"{}\" converted approximately: the {} model is not equivalent to the target spring model",
                        comp.type_name,
                        node.name,
                        probe.label()
                    ),
                ));
                groups.push(group);
            }
        }

        if groups.is_empty() {
            report.push(Notification::info(ID, "no secondary-motion components found"));
        } else {
            report.push(Notification::info(
                ID,
                format!("normalized {} secondary-motion chains", groups.len()),
            ));
        }

        ctx.exchange.spring_groups = groups;
        report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stages/map_dynamics.rs"]
mod tests;
