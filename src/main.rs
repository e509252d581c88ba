#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    map_app::flow::run(map_app::SceneConfig::default())
}

// The web build starts from the library's `wasm_bindgen(start)` entry.
#[cfg(target_arch = "wasm32")]
fn main() {}
