//! # Module Registry
//!
//! Ordered list of registered modules plus the pointer to the currently
//! active one. Modules are registered once at startup; the active pointer
//! changes on selection events and resets to `None` (selector menu) when a
//! module finishes or the user backs out.
//!
//! Readiness: each module's `refresh()` bumps a counter; the selector menu is
//! only shown once every module has been counted, successful or not.

use log::{info, warn};

use crate::core::module::{Module, ModuleInfo};

pub struct Registry {
    modules: Vec<Box<dyn Module>>,
    active: Option<usize>,
    ready_count: usize,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            active: None,
            ready_count: 0,
        }
    }

    pub fn register(&mut self, module: Box<dyn Module>) {
        info!("registry: registered module {}", module.info().id);
        self.modules.push(module);
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Menu metadata, in registration order.
    pub fn infos(&self) -> Vec<ModuleInfo> {
        self.modules.iter().map(|m| m.info()).collect()
    }

    pub fn ready(&self) -> bool {
        self.ready_count >= self.modules.len()
    }

    /// Run `refresh()` on every module, counting each towards readiness.
    pub async fn refresh_all(&mut self) {
        self.ready_count = 0;
        for module in &mut self.modules {
            let id = module.info().id;
            if let Err(e) = module.refresh().await {
                warn!("registry: refresh failed for {}: {}", id, e);
            }
            self.ready_count += 1;
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_mut(&mut self) -> Option<&mut Box<dyn Module>> {
        self.active.map(|i| &mut self.modules[i])
    }

    /// Activate the module at `index` and show it. Out-of-range indices are
    /// ignored (stale selection after a config reload).
    pub async fn activate(&mut self, index: usize) {
        if index >= self.modules.len() {
            warn!("registry: activate out of range: {}", index);
            return;
        }
        self.active = Some(index);
        self.modules[index].on_visible().await;
    }

    /// Set the active pointer without firing `on_visible`, for modules that
    /// claim the screen themselves (YouTube submission).
    pub fn self_activate(&mut self, id: &str) -> bool {
        match self.modules.iter().position(|m| m.info().id == id) {
            Some(i) => {
                self.active = Some(i);
                true
            }
            None => {
                warn!("registry: self-activate for unknown module {}", id);
                false
            }
        }
    }

    /// Clear the active pointer. Idempotent; does not touch the module.
    pub fn reset(&mut self) {
        self.active = None;
    }

    /// Shutdown: terminate the active module.
    pub async fn terminate(&mut self) {
        if let Some(module) = self.active_mut() {
            module.on_terminate().await;
        }
        self.active = None;
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CallLog, NoopModule};

    fn registry_with(ids: &[&str]) -> (Registry, CallLog) {
        let log = CallLog::new();
        let mut registry = Registry::new();
        for id in ids {
            registry.register(Box::new(NoopModule::new(id, log.clone())));
        }
        (registry, log)
    }

    #[tokio::test]
    async fn test_register_preserves_order() {
        let (registry, _log) = registry_with(&["radio", "tvnews", "tvstreams"]);
        let ids: Vec<String> = registry.infos().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["radio", "tvnews", "tvstreams"]);
    }

    #[tokio::test]
    async fn test_not_ready_until_all_refreshed() {
        let (mut registry, _log) = registry_with(&["a", "b"]);
        assert!(!registry.ready());
        registry.refresh_all().await;
        assert!(registry.ready());
    }

    #[tokio::test]
    async fn test_activate_fires_on_visible() {
        let (mut registry, log) = registry_with(&["a", "b"]);
        registry.activate(1).await;
        assert_eq!(registry.active_index(), Some(1));
        assert_eq!(log.take(), vec!["b:on_visible"]);
    }

    #[tokio::test]
    async fn test_activate_out_of_range_is_ignored() {
        let (mut registry, log) = registry_with(&["a"]);
        registry.activate(5).await;
        assert_eq!(registry.active_index(), None);
        assert!(log.take().is_empty());
    }

    #[tokio::test]
    async fn test_self_activate_by_id() {
        let (mut registry, log) = registry_with(&["a", "youtube"]);
        assert!(registry.self_activate("youtube"));
        assert_eq!(registry.active_index(), Some(1));
        // No on_visible for self-activation.
        assert!(log.take().is_empty());
    }

    #[tokio::test]
    async fn test_self_activate_unknown_id() {
        let (mut registry, _log) = registry_with(&["a"]);
        assert!(!registry.self_activate("nope"));
        assert_eq!(registry.active_index(), None);
    }

    #[tokio::test]
    async fn test_reset_is_idempotent() {
        let (mut registry, _log) = registry_with(&["a"]);
        registry.activate(0).await;
        registry.reset();
        registry.reset();
        assert_eq!(registry.active_index(), None);
    }

    #[tokio::test]
    async fn test_terminate_reaches_active_module_only() {
        let (mut registry, log) = registry_with(&["a", "b"]);
        registry.activate(0).await;
        log.take();
        registry.terminate().await;
        assert_eq!(log.take(), vec!["a:on_terminate"]);
        assert_eq!(registry.active_index(), None);
    }
}
