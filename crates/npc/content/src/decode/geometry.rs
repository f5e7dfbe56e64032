//! Skin geometry documents and format-version dispatch.
//!
//! Geometry files come in two shapes. Modern documents (`format_version`
//! `"1.12.0"` or `"1.16.0"`) carry a `minecraft:geometry` array whose first
//! entry names the model under `description.identifier`. Everything else is
//! treated as the legacy shape, where the model name is the first top-level
//! key starting with `geometry`. A document that matches neither yields no
//! identifier; callers fall back to the built-in humanoid template.

use npc_core::ArmWidth;
use serde_json::Value;

/// Built-in humanoid geometry, covering both arm widths and the cape bone.
pub const BUILTIN_GEOMETRY: &str = r#"{"format_version":"1.12.0","minecraft:geometry":[{"bones":[{"name":"body","parent":"waist","pivot":[0.0,24.0,0.0]},{"name":"waist","pivot":[0.0,12.0,0.0]},{"cubes":[{"origin":[-5.0,8.0,3.0],"size":[10,16,1],"uv":[0,0]}],"name":"cape","parent":"body","pivot":[0.0,24.0,3.0],"rotation":[0.0,180.0,0.0]}],"description":{"identifier":"geometry.cape","texture_height":32,"texture_width":64}},{"bones":[{"name":"root","pivot":[0.0,0.0,0.0]},{"cubes":[{"origin":[-4.0,12.0,-2.0],"size":[8,12,4],"uv":[16,16]}],"name":"body","parent":"waist","pivot":[0.0,24.0,0.0]},{"name":"waist","parent":"root","pivot":[0.0,12.0,0.0]},{"cubes":[{"origin":[-4.0,24.0,-4.0],"size":[8,8,8],"uv":[0,0]}],"name":"head","parent":"body","pivot":[0.0,24.0,0.0]},{"name":"cape","parent":"body","pivot":[0.0,24,3.0]},{"cubes":[{"inflate":0.50,"origin":[-4.0,24.0,-4.0],"size":[8,8,8],"uv":[32,0]}],"name":"hat","parent":"head","pivot":[0.0,24.0,0.0]},{"cubes":[{"origin":[4.0,12.0,-2.0],"size":[4,12,4],"uv":[32,48]}],"name":"leftArm","parent":"body","pivot":[5.0,22.0,0.0]},{"cubes":[{"inflate":0.250,"origin":[4.0,12.0,-2.0],"size":[4,12,4],"uv":[48,48]}],"name":"leftSleeve","parent":"leftArm","pivot":[5.0,22.0,0.0]},{"name":"leftItem","parent":"leftArm","pivot":[6.0,15.0,1.0]},{"cubes":[{"origin":[-8.0,12.0,-2.0],"size":[4,12,4],"uv":[40,16]}],"name":"rightArm","parent":"body","pivot":[-5.0,22.0,0.0]},{"cubes":[{"inflate":0.250,"origin":[-8.0,12.0,-2.0],"size":[4,12,4],"uv":[40,32]}],"name":"rightSleeve","parent":"rightArm","pivot":[-5.0,22.0,0.0]},{"locators":{"lead_hold":[-6,15,1]},"name":"rightItem","parent":"rightArm","pivot":[-6,15,1]},{"cubes":[{"origin":[-0.10,0.0,-2.0],"size":[4,12,4],"uv":[16,48]}],"name":"leftLeg","parent":"root","pivot":[1.90,12.0,0.0]},{"cubes":[{"inflate":0.250,"origin":[-0.10,0.0,-2.0],"size":[4,12,4],"uv":[0,48]}],"name":"leftPants","parent":"leftLeg","pivot":[1.90,12.0,0.0]},{"cubes":[{"origin":[-3.90,0.0,-2.0],"size":[4,12,4],"uv":[0,16]}],"name":"rightLeg","parent":"root","pivot":[-1.90,12.0,0.0]},{"cubes":[{"inflate":0.250,"origin":[-3.90,0.0,-2.0],"size":[4,12,4],"uv":[0,32]}],"name":"rightPants","parent":"rightLeg","pivot":[-1.90,12.0,0.0]},{"cubes":[{"inflate":0.250,"origin":[-4.0,12.0,-2.0],"size":[8,12,4],"uv":[16,32]}],"name":"jacket","parent":"body","pivot":[0.0,24.0,0.0]}],"description":{"identifier":"geometry.humanoid.custom","texture_height":64,"texture_width":64,"visible_bounds_height":2,"visible_bounds_offset":[0,1,0],"visible_bounds_width":1}},{"bones":[{"name":"root","pivot":[0.0,0.0,0.0]},{"name":"waist","parent":"root","pivot":[0.0,12.0,0.0]},{"cubes":[{"origin":[-4.0,12.0,-2.0],"size":[8,12,4],"uv":[16,16]}],"name":"body","parent":"waist","pivot":[0.0,24.0,0.0]},{"cubes":[{"origin":[-4.0,24.0,-4.0],"size":[8,8,8],"uv":[0,0]}],"name":"head","parent":"body","pivot":[0.0,24.0,0.0]},{"cubes":[{"inflate":0.50,"origin":[-4.0,24.0,-4.0],"size":[8,8,8],"uv":[32,0]}],"name":"hat","parent":"head","pivot":[0.0,24.0,0.0]},{"cubes":[{"origin":[-3.90,0.0,-2.0],"size":[4,12,4],"uv":[0,16]}],"name":"rightLeg","parent":"root","pivot":[-1.90,12.0,0.0]},{"cubes":[{"inflate":0.250,"origin":[-3.90,0.0,-2.0],"size":[4,12,4],"uv":[0,32]}],"name":"rightPants","parent":"rightLeg","pivot":[-1.90,12.0,0.0]},{"cubes":[{"origin":[-0.10,0.0,-2.0],"size":[4,12,4],"uv":[16,48]}],"name":"leftLeg","parent":"root","pivot":[1.90,12.0,0.0]},{"cubes":[{"inflate":0.250,"origin":[-0.10,0.0,-2.0],"size":[4,12,4],"uv":[0,48]}],"name":"leftPants","parent":"leftLeg","pivot":[1.90,12.0,0.0]},{"cubes":[{"origin":[4.0,11.50,-2.0],"size":[3,12,4],"uv":[32,48]}],"name":"leftArm","parent":"body","pivot":[5.0,21.50,0.0]},{"cubes":[{"inflate":0.250,"origin":[4.0,11.50,-2.0],"size":[3,12,4],"uv":[48,48]}],"name":"leftSleeve","parent":"leftArm","pivot":[5.0,21.50,0.0]},{"name":"leftItem","parent":"leftArm","pivot":[6,14.50,1]},{"cubes":[{"origin":[-7.0,11.50,-2.0],"size":[3,12,4],"uv":[40,16]}],"name":"rightArm","parent":"body","pivot":[-5.0,21.50,0.0]},{"cubes":[{"inflate":0.250,"origin":[-7.0,11.50,-2.0],"size":[3,12,4],"uv":[40,32]}],"name":"rightSleeve","parent":"rightArm","pivot":[-5.0,21.50,0.0]},{"locators":{"lead_hold":[-6,14.50,1]},"name":"rightItem","parent":"rightArm","pivot":[-6,14.50,1]},{"cubes":[{"inflate":0.250,"origin":[-4.0,12.0,-2.0],"size":[8,12,4],"uv":[16,32]}],"name":"jacket","parent":"body","pivot":[0.0,24.0,0.0]},{"name":"cape","parent":"body","pivot":[0.0,24,-3.0]}],"description":{"identifier":"geometry.humanoid.customSlim","texture_height":64,"texture_width":64,"visible_bounds_height":2,"visible_bounds_offset":[0,1,0],"visible_bounds_width":1}}]}"#;

/// Resource patch binding the built-in wide-arm variant.
pub const RESOURCE_PATCH_WIDE: &str = r#"{"geometry":{"default":"geometry.humanoid.custom"}}"#;

/// Resource patch binding the built-in slim-arm variant.
pub const RESOURCE_PATCH_SLIM: &str = r#"{"geometry":{"default":"geometry.humanoid.customSlim"}}"#;

/// Version assumed when a document does not declare `format_version`.
const LEGACY_FORMAT_VERSION: &str = "1.10.0";

/// Versions using the `minecraft:geometry` array shape.
const MODERN_FORMAT_VERSIONS: [&str; 2] = ["1.12.0", "1.16.0"];

/// Resource patch for the built-in template matching the given arm width.
pub fn default_resource_patch(arm_width: ArmWidth) -> &'static str {
    match arm_width {
        ArmWidth::Wide => RESOURCE_PATCH_WIDE,
        ArmWidth::Slim => RESOURCE_PATCH_SLIM,
    }
}

/// Resource patch binding a custom geometry identifier.
pub fn resource_patch(identifier: &str) -> String {
    format!(r#"{{"geometry":{{"default":"{identifier}"}}}}"#)
}

/// Extracts the geometry identifier from a custom geometry document.
///
/// Returns `Ok(None)` when the document parses but names no identifier under
/// the shape its `format_version` selects; the caller treats that as "no
/// custom geometry usable". Only an unparseable document is an error.
pub fn extract_identifier(document: &str) -> Result<Option<String>, serde_json::Error> {
    let doc: Value = serde_json::from_str(document)?;
    let version = format_version(&doc);
    let identifier = if MODERN_FORMAT_VERSIONS.contains(&version) {
        modern_identifier(&doc)
    } else {
        legacy_identifier(&doc)
    };
    Ok(identifier)
}

fn format_version(doc: &Value) -> &str {
    doc.get("format_version")
        .and_then(Value::as_str)
        .unwrap_or(LEGACY_FORMAT_VERSION)
}

/// Modern shape: `minecraft:geometry[0].description.identifier`.
fn modern_identifier(doc: &Value) -> Option<String> {
    doc.get("minecraft:geometry")?
        .as_array()?
        .first()?
        .get("description")?
        .get("identifier")?
        .as_str()
        .map(str::to_owned)
}

/// Legacy shape: first top-level key starting with `geometry`.
fn legacy_identifier(doc: &Value) -> Option<String> {
    doc.as_object()?
        .keys()
        .find(|key| key.starts_with("geometry"))
        .cloned()
}
