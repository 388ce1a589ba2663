use std::sync::{Arc, PoisonError, RwLock};

use crate::{
    composition::model::{AnimationTimeline, Layer, Scene, TransitionType},
    foundation::error::{KinetypeError, KinetypeResult},
};

/// Shared, copy-on-write owner of the current timeline.
///
/// Readers take an `Arc` snapshot and never observe a half-applied edit. Writers clone the
/// current snapshot, apply the edit, refresh derived fields, and publish the result.
#[derive(Debug)]
pub struct TimelineHandle {
    current: RwLock<Arc<AnimationTimeline>>,
}

impl TimelineHandle {
    pub fn new(mut timeline: AnimationTimeline) -> Self {
        timeline.normalize();
        Self {
            current: RwLock::new(Arc::new(timeline)),
        }
    }

    pub fn snapshot(&self) -> Arc<AnimationTimeline> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `f` to a private copy and publish it. On error the published timeline is untouched.
    pub fn edit<F>(&self, f: F) -> KinetypeResult<Arc<AnimationTimeline>>
    where
        F: FnOnce(&mut AnimationTimeline) -> KinetypeResult<()>,
    {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = AnimationTimeline::clone(&guard);
        f(&mut next)?;
        next.normalize();
        let next = Arc::new(next);
        *guard = Arc::clone(&next);
        tracing::debug!(
            scenes = next.scenes.len(),
            total_frames = next.video.total_frames,
            "timeline edit published"
        );
        Ok(next)
    }

    /// Swap in a whole new timeline.
    pub fn replace(&self, mut timeline: AnimationTimeline) -> Arc<AnimationTimeline> {
        timeline.normalize();
        let next = Arc::new(timeline);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&next);
        next
    }
}

fn scene_mut<'a>(t: &'a mut AnimationTimeline, id: &str) -> KinetypeResult<&'a mut Scene> {
    t.scenes
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| KinetypeError::validation(format!("unknown scene '{id}'")))
}

/// Set a scene's requested duration. Short values are kept and clamped at playback.
pub fn set_scene_duration(
    t: &mut AnimationTimeline,
    id: &str,
    frames: i64,
) -> KinetypeResult<()> {
    scene_mut(t, id)?.duration_in_frames = frames;
    Ok(())
}

pub fn set_transition(
    t: &mut AnimationTimeline,
    id: &str,
    kind: TransitionType,
) -> KinetypeResult<()> {
    scene_mut(t, id)?.transition_type = kind;
    Ok(())
}

/// Insert `scene` at `index` (appending when past the end).
pub fn insert_scene(t: &mut AnimationTimeline, index: usize, scene: Scene) -> KinetypeResult<()> {
    if t.scenes.iter().any(|s| s.id == scene.id) {
        return Err(KinetypeError::validation(format!(
            "duplicate scene id '{}'",
            scene.id
        )));
    }
    let index = index.min(t.scenes.len());
    t.scenes.insert(index, scene);
    Ok(())
}

pub fn remove_scene(t: &mut AnimationTimeline, id: &str) -> KinetypeResult<Scene> {
    let idx = t
        .scene_index(id)
        .ok_or_else(|| KinetypeError::validation(format!("unknown scene '{id}'")))?;
    Ok(t.scenes.remove(idx))
}

pub fn move_scene(t: &mut AnimationTimeline, from: usize, to: usize) -> KinetypeResult<()> {
    let len = t.scenes.len();
    if from >= len || to >= len {
        return Err(KinetypeError::validation(format!(
            "scene move {from} -> {to} out of range for {len} scenes"
        )));
    }
    let scene = t.scenes.remove(from);
    t.scenes.insert(to, scene);
    Ok(())
}

pub fn replace_layer(
    t: &mut AnimationTimeline,
    scene_id: &str,
    layer_index: usize,
    layer: Layer,
) -> KinetypeResult<Layer> {
    let scene = scene_mut(t, scene_id)?;
    let slot = scene.layers.get_mut(layer_index).ok_or_else(|| {
        KinetypeError::validation(format!(
            "scene '{scene_id}' has no layer at index {layer_index}"
        ))
    })?;
    Ok(std::mem::replace(slot, layer))
}

pub fn rename_project(t: &mut AnimationTimeline, name: impl Into<String>) -> KinetypeResult<()> {
    let name = name.into();
    if name.trim().is_empty() {
        return Err(KinetypeError::validation("project name must be non-empty"));
    }
    t.project_name = name;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composition/edit.rs"]
mod tests;
