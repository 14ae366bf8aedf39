//! Scene description loading.
//!
//! A scene file is a JSON document with named texture, material and
//! animation definitions plus a camera block and an object list. Loading
//! is all or nothing: a malformed document fails with one parse error and
//! produces no world. Unresolvable references inside a well-formed
//! document are warned about and skipped, construction continues.

use crate::animation::{AnimatedValue, AnimatedVector};
use crate::camera::Camera;
use crate::world::material::{Dielectric, Lambertian, Material, Metal};
use crate::world::surface::Sphere;
use crate::world::texture::{Checker, SolidColor, TextureRef};
use crate::world::{Object, World};
use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use ultraviolet::Vec3;

#[derive(Deserialize)]
struct SceneFile {
    #[serde(default)]
    textures: Vec<TextureDef>,
    #[serde(default)]
    materials: Vec<MaterialDef>,
    #[serde(default)]
    animations: Vec<AnimationDef>,
    scene: SceneDef,
}

#[derive(Deserialize)]
struct TextureDef {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    color: [f32; 3],
    #[serde(default)]
    size: f32,
    #[serde(default)]
    even: String,
    #[serde(default)]
    odd: String,
}

#[derive(Deserialize)]
struct MaterialDef {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    diffuse: [f32; 3],
    #[serde(default)]
    texture: String,
    #[serde(default)]
    param: f32,
}

#[derive(Deserialize)]
struct AnimationDef {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    scale: f32,
    #[serde(default)]
    speed: f32,
    #[serde(default)]
    radius: f32,
    #[serde(default)]
    center: [f32; 3],
}

/// Fixed scalar or reference to a named animation.
#[derive(Deserialize, Default)]
struct ValueRef {
    #[serde(default)]
    value: f32,
    #[serde(default)]
    anim: String,
}

/// Fixed vector or reference to a named animation.
#[derive(Deserialize)]
struct VectorRef {
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    z: f32,
    #[serde(default)]
    anim: String,
}

#[derive(Deserialize)]
struct CameraDef {
    position: VectorRef,
    lookat: VectorRef,
    up: VectorRef,
    fov: ValueRef,
    #[serde(default)]
    aperture: ValueRef,
}

#[derive(Deserialize)]
struct ObjectDef {
    #[serde(rename = "type")]
    kind: String,
    position: VectorRef,
    radius: ValueRef,
    material: String,
}

#[derive(Deserialize)]
struct SceneDef {
    camera: CameraDef,
    #[serde(default)]
    objects: Vec<ObjectDef>,
}

/// Named animation definitions; each binding site gets its own clone so
/// bindings animate independently.
#[derive(Default)]
struct Definitions {
    values: HashMap<String, AnimatedValue>,
    vectors: HashMap<String, AnimatedVector>,
}

impl Definitions {
    fn resolve_value(&self, r: &ValueRef) -> Option<AnimatedValue> {
        if r.anim.is_empty() {
            Some(AnimatedValue::fixed(r.value))
        } else if let Some(anim) = self.values.get(&r.anim) {
            Some(anim.clone())
        } else {
            warn!("animation not found: '{}'", r.anim);
            None
        }
    }

    fn resolve_vector(&self, r: &VectorRef) -> Option<AnimatedVector> {
        if r.anim.is_empty() {
            Some(AnimatedVector::fixed(Vec3::new(r.x, r.y, r.z)))
        } else if let Some(anim) = self.vectors.get(&r.anim) {
            Some(anim.clone())
        } else {
            warn!("animation not found: '{}'", r.anim);
            None
        }
    }

    // The camera cannot be skipped, unresolved references fall back to
    // the fixed part of the reference.
    fn resolve_value_or_fixed(&self, r: &ValueRef) -> AnimatedValue {
        self.resolve_value(r)
            .unwrap_or_else(|| AnimatedValue::fixed(r.value))
    }

    fn resolve_vector_or_fixed(&self, r: &VectorRef) -> AnimatedVector {
        self.resolve_vector(r)
            .unwrap_or_else(|| AnimatedVector::fixed(Vec3::new(r.x, r.y, r.z)))
    }
}

pub fn load(path: impl AsRef<Path>, aspect_ratio: f32) -> Result<World> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read scene file {}", path.display()))?;
    from_json(&text, aspect_ratio)
}

pub fn from_json(text: &str, aspect_ratio: f32) -> Result<World> {
    let file: SceneFile = serde_json::from_str(text).context("malformed scene document")?;

    let mut defs = Definitions::default();
    for def in &file.animations {
        match def.kind.as_str() {
            "sin" => {
                defs.values
                    .insert(def.name.clone(), AnimatedValue::sinusoid(def.scale, def.speed));
            }
            "orbit" => {
                defs.vectors.insert(
                    def.name.clone(),
                    AnimatedVector::orbit(Vec3::from(def.center), def.radius, def.speed),
                );
            }
            other => warn!("unknown animation type '{}' for '{}'", other, def.name),
        }
    }

    let mut textures: HashMap<String, TextureRef> = HashMap::new();
    for def in &file.textures {
        let texture: Option<TextureRef> = match def.kind.as_str() {
            "static" => Some(Arc::new(SolidColor::new(Vec3::from(def.color)))),
            "checker" => match (textures.get(&def.even), textures.get(&def.odd)) {
                (Some(even), Some(odd)) => {
                    Some(Arc::new(Checker::new(def.size, even.clone(), odd.clone())))
                }
                _ => {
                    warn!("checker texture '{}' references undefined textures", def.name);
                    None
                }
            },
            other => {
                warn!("unknown texture type '{}' for '{}'", other, def.name);
                None
            }
        };
        if let Some(texture) = texture {
            textures.insert(def.name.clone(), texture);
        }
    }

    let mut materials: HashMap<String, Material> = HashMap::new();
    for def in &file.materials {
        let material: Option<Material> = match def.kind.as_str() {
            "lambert" => {
                let albedo: Option<TextureRef> = if def.texture.is_empty() {
                    Some(Arc::new(SolidColor::new(Vec3::from(def.diffuse))))
                } else if let Some(texture) = textures.get(&def.texture) {
                    Some(texture.clone())
                } else {
                    warn!("texture not found: '{}'", def.texture);
                    None
                };
                albedo.map(|albedo| Arc::new(Lambertian::new(albedo)) as Material)
            }
            "metal" => Some(Arc::new(Metal::new(Vec3::from(def.diffuse), def.param))),
            "dielectric" => Some(Arc::new(Dielectric::new(def.param))),
            other => {
                warn!("unknown material type '{}' for '{}'", other, def.name);
                None
            }
        };
        if let Some(material) = material {
            materials.insert(def.name.clone(), material);
        }
    }

    let cam = &file.scene.camera;
    let camera = Camera::new(
        defs.resolve_vector_or_fixed(&cam.position),
        defs.resolve_vector_or_fixed(&cam.lookat),
        defs.resolve_vector_or_fixed(&cam.up),
        defs.resolve_value_or_fixed(&cam.fov),
        defs.resolve_value_or_fixed(&cam.aperture),
        aspect_ratio,
    );

    let mut objects = Vec::new();
    for def in &file.scene.objects {
        match def.kind.as_str() {
            "sphere" => {
                let material = match materials.get(&def.material) {
                    Some(material) => material.clone(),
                    None => {
                        warn!("object material not found: '{}'", def.material);
                        continue;
                    }
                };
                let (position, radius) =
                    match (defs.resolve_vector(&def.position), defs.resolve_value(&def.radius)) {
                        (Some(position), Some(radius)) => (position, radius),
                        _ => continue,
                    };
                objects.push(Object {
                    surface: Box::new(Sphere::new(position, radius)),
                    material,
                });
            }
            other => warn!("unknown object type '{}'", other),
        }
    }

    Ok(World::new(camera, objects))
}
