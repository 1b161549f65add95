// Toolbar: workbook path and reload
#![allow(non_snake_case)]
use dioxus::prelude::*;

use crate::state::app_state::AppState;

#[component]
pub fn Toolbar(workbook: String, on_reload: EventHandler<String>) -> Element {
    let state = use_context::<AppState>();
    let mut path = use_signal(|| workbook.clone());
    let palette = &state.palette;

    rsx! {
        div { class: "toolbar", style: "display: flex; gap: 8px; align-items: center; padding: 8px 0; color: {palette.foreground};",
            span { "Workbook" }
            input {
                r#type: "text",
                style: "flex: 1;",
                value: "{path}",
                oninput: move |evt: FormEvent| path.set(evt.value()),
            }
            button {
                style: "background: {palette.accent}; color: white; border: none; padding: 4px 12px; border-radius: 4px;",
                onclick: move |_| on_reload.call(path.read().clone()),
                "Reload"
            }
        }
    }
}
