pub fn relay_url(protocol: &str, host: &str) -> String {
    let scheme = if protocol == "https:" { "wss" } else { "ws" };
    format!("{scheme}://{host}/ws")
}

#[cfg(target_arch = "wasm32")]
pub fn websocket_url(window: &web_sys::Window) -> Result<String, wasm_bindgen::JsValue> {
    let location = window.location();
    Ok(relay_url(&location.protocol()?, &location.host()?))
}
