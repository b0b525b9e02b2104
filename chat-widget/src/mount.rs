//! One-time creation of the element the widget renders into.

use wasm_bindgen::JsValue;
use web_sys::Document;

/// The bits of the host page the mount guard needs.
pub trait HostDocument {
    fn has_element(&self, id: &str) -> bool;
    fn create_root(&self, id: &str) -> Result<(), String>;
    /// Returns `false` when there was nothing to remove.
    fn remove_root(&self, id: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    Mounted,
    AlreadyMounted,
}

/// Create the widget root unless a previous load already did.
pub fn mount_root(doc: &impl HostDocument, id: &str) -> Result<MountOutcome, String> {
    if doc.has_element(id) {
        return Ok(MountOutcome::AlreadyMounted);
    }
    doc.create_root(id)?;
    Ok(MountOutcome::Mounted)
}

impl HostDocument for Document {
    fn has_element(&self, id: &str) -> bool {
        self.get_element_by_id(id).is_some()
    }

    fn create_root(&self, id: &str) -> Result<(), String> {
        let body = self
            .body()
            .ok_or_else(|| "document has no body".to_string())?;
        let root = self.create_element("div").map_err(dom_error)?;
        root.set_id(id);
        body.append_child(&root).map_err(dom_error)?;
        Ok(())
    }

    fn remove_root(&self, id: &str) -> bool {
        match self.get_element_by_id(id) {
            Some(root) => {
                root.remove();
                true
            }
            None => false,
        }
    }
}

fn dom_error(value: JsValue) -> String {
    format!("DOM error: {value:?}")
}
