use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::SceneId;
use crate::services::editor::SceneEditor;

/// An editor shared between requests. Each request locks one scene.
pub type SharedEditor = Arc<RwLock<SceneEditor>>;

/// Trait for scene storage
#[async_trait]
pub trait SceneStore: Send + Sync {
    /// Store a new scene and return its handle
    async fn insert(&self, id: SceneId, editor: SceneEditor) -> SharedEditor;

    /// Find scene by ID
    async fn get(&self, id: &SceneId) -> Option<SharedEditor>;

    /// Drop a scene, returning whether it existed
    async fn remove(&self, id: &SceneId) -> bool;

    async fn len(&self) -> usize;
}

/// In-memory scene storage
pub struct InMemorySceneStore {
    scenes: Arc<RwLock<HashMap<SceneId, SharedEditor>>>,
}

impl InMemorySceneStore {
    pub fn new() -> Self {
        Self {
            scenes: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemorySceneStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SceneStore for InMemorySceneStore {
    async fn insert(&self, id: SceneId, editor: SceneEditor) -> SharedEditor {
        let editor = Arc::new(RwLock::new(editor));
        let mut scenes = self.scenes.write().await;
        scenes.insert(id, editor.clone());
        editor
    }

    async fn get(&self, id: &SceneId) -> Option<SharedEditor> {
        let scenes = self.scenes.read().await;
        scenes.get(id).cloned()
    }

    async fn remove(&self, id: &SceneId) -> bool {
        let mut scenes = self.scenes.write().await;
        scenes.remove(id).is_some()
    }

    async fn len(&self) -> usize {
        self.scenes.read().await.len()
    }
}
