//! ツール固有オプションのフォーム
//!
//! カタログのスキーマから入力欄を生成し、値は `ToolState::values` に保持する。

use crate::state::ToolState;
use leptos::prelude::*;
use pdf_master_common::tool::{InputKind, OptionField};
use web_sys::Event;

#[component]
pub fn OptionsForm(state: ToolState) -> impl IntoView {
    move || {
        let Some(definition) = state.definition() else {
            return ().into_any();
        };
        if definition.options.is_empty() {
            return ().into_any();
        }
        view! {
            <div class="tool-options">
                {definition
                    .options
                    .iter()
                    .map(|field| option_input(state, field))
                    .collect_view()}
            </div>
        }
        .into_any()
    }
}

fn option_input(state: ToolState, field: &'static OptionField) -> impl IntoView {
    let key = field.key;
    let current = move || {
        state
            .values
            .with(|v| v.get(key).unwrap_or_default().to_string())
    };
    let on_input = move |ev: Event| state.set_value(key, event_target_value(&ev));

    let input = match field.kind {
        InputKind::Text { placeholder } => view! {
            <input type="text" id=key placeholder=placeholder prop:value=current on:input=on_input />
        }
        .into_any(),
        InputKind::Password { placeholder } => view! {
            <input type="password" id=key placeholder=placeholder prop:value=current on:input=on_input />
        }
        .into_any(),
        InputKind::Number { min } => view! {
            <input
                type="number"
                id=key
                min=min.map(|m| m.to_string())
                prop:value=current
                on:input=on_input
            />
        }
        .into_any(),
        InputKind::Select(choices) => view! {
            <select id=key prop:value=current on:change=on_input>
                {choices
                    .iter()
                    .map(|choice| {
                        let value = choice.value;
                        view! {
                            <option
                                value=value
                                selected=move || state.values.with(|v| v.get(key) == Some(value))
                            >
                                {choice.label}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        }
        .into_any(),
        InputKind::Percent { min, max } => view! {
            <input
                type="range"
                id=key
                min=min.to_string()
                max=max.to_string()
                prop:value=current
                on:input=on_input
            />
            <span class="range-value">{move || format!("{}%", current())}</span>
        }
        .into_any(),
    };

    view! {
        <div class="form-group">
            <label for=key>{field.label}</label>
            {input}
        </div>
    }
}
