//! Schema-driven form: renders editable controls from a JSON Schema plus the
//! current draft value.
//!
//! Top-level object properties become controls by type: strings get a text
//! input (or a textarea when the schema hints at long text), enums a select,
//! numbers a number input, booleans a checkbox, and nested objects a
//! fieldset. Anything the renderer does not understand — arrays, unions,
//! missing types — falls back to a free-text JSON editor instead of failing
//! to render. Every edit emits the whole updated draft; the parent owns
//! dirtiness and submission.

use client::{set_value_at, value_at, FieldError};
use serde_json::Value;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SchemaFormProps {
    pub schema: Value,
    pub value: Value,
    /// Validation failures to render inline, addressed by JSON Pointer.
    #[prop_or_default]
    pub errors: Vec<FieldError>,
    pub on_change: Callback<Value>,
    pub on_submit: Callback<()>,
}

pub enum Msg {
    Edited { pointer: String, new_value: Value },
    Submit,
}

pub struct SchemaForm;

impl Component for SchemaForm {
    type Message = Msg;
    type Properties = SchemaFormProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Edited { pointer, new_value } => {
                let mut draft = ctx.props().value.clone();
                set_value_at(&mut draft, &pointer, new_value);
                ctx.props().on_change.emit(draft);
                // the parent re-renders us with the updated value
                false
            }
            Msg::Submit => {
                ctx.props().on_submit.emit(());
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let root_errors = props
            .errors
            .iter()
            .filter(|error| error.pointer.is_empty())
            .map(|error| html! { <div class="field-error">{ &error.message }</div> })
            .collect::<Html>();
        let body = if is_object_schema(&props.schema) {
            render_properties(ctx, "", &props.schema)
        } else {
            html! {
                <div class="form-field">
                    { control(ctx, "", &props.schema) }
                </div>
            }
        };
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });
        html! {
            <form class="schema-form" {onsubmit}>
                { root_errors }
                { body }
                // lets Enter submit the form; the visible save action lives
                // in the parent's toolbar
                <button type="submit" style="display: none;">{"Submit"}</button>
            </form>
        }
    }
}

fn is_object_schema(schema: &Value) -> bool {
    schema.get("type").and_then(Value::as_str) == Some("object")
        || schema.get("properties").is_some()
}

fn render_properties(ctx: &Context<SchemaForm>, pointer_prefix: &str, schema: &Value) -> Html {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        // an object schema without declared properties: edit it raw
        return html! {
            <div class="form-field">
                { control(ctx, pointer_prefix, &Value::Null) }
            </div>
        };
    };
    properties
        .iter()
        .map(|(name, prop_schema)| {
            let pointer = format!("{pointer_prefix}/{}", escape(name));
            render_field(ctx, &pointer, name, prop_schema)
        })
        .collect::<Html>()
}

fn render_field(ctx: &Context<SchemaForm>, pointer: &str, name: &str, schema: &Value) -> Html {
    let label = schema
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(name);

    if is_object_schema(schema) {
        return html! {
            <fieldset>
                <legend>{ label }</legend>
                { render_properties(ctx, pointer, schema) }
            </fieldset>
        };
    }

    let description = schema.get("description").and_then(Value::as_str);
    let errors = ctx
        .props()
        .errors
        .iter()
        .filter(|error| error.pointer == pointer)
        .map(|error| html! { <div class="field-error">{ &error.message }</div> })
        .collect::<Html>();
    html! {
        <div class="form-field">
            <label>{ label }</label>
            { control(ctx, pointer, schema) }
            {
                description
                    .map(|text| html! { <span class="field-hint">{ text }</span> })
                    .unwrap_or_default()
            }
            { errors }
        </div>
    }
}

fn control(ctx: &Context<SchemaForm>, pointer: &str, schema: &Value) -> Html {
    let current = value_at(&ctx.props().value, pointer);
    if let Some(options) = schema.get("enum").and_then(Value::as_array) {
        return select_control(ctx, pointer, options, current);
    }
    match schema.get("type").and_then(Value::as_str) {
        Some("string") => text_control(ctx, pointer, schema, current),
        Some("number") => number_control(ctx, pointer, current, false),
        Some("integer") => number_control(ctx, pointer, current, true),
        Some("boolean") => bool_control(ctx, pointer, current),
        // arrays, unions, and anything unrecognized: raw JSON editing
        _ => json_control(ctx, pointer, current),
    }
}

fn text_control(
    ctx: &Context<SchemaForm>,
    pointer: &str,
    schema: &Value,
    current: Option<&Value>,
) -> Html {
    let text = current.and_then(Value::as_str).unwrap_or("").to_string();
    let pointer = pointer.to_string();
    if is_long_text(schema) {
        let oninput = ctx.link().callback(move |e: InputEvent| {
            let area: HtmlTextAreaElement = e.target_unchecked_into();
            Msg::Edited {
                pointer: pointer.clone(),
                new_value: Value::String(area.value()),
            }
        });
        html! { <textarea rows={8} value={text} {oninput} /> }
    } else {
        let oninput = ctx.link().callback(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::Edited {
                pointer: pointer.clone(),
                new_value: Value::String(input.value()),
            }
        });
        html! { <input type="text" value={text} {oninput} /> }
    }
}

fn number_control(
    ctx: &Context<SchemaForm>,
    pointer: &str,
    current: Option<&Value>,
    integer: bool,
) -> Html {
    let text = match current {
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::String(text)) => text.clone(),
        _ => String::new(),
    };
    let pointer = pointer.to_string();
    let oninput = ctx.link().callback(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let raw = input.value();
        let new_value = if raw.is_empty() {
            Value::Null
        } else if integer {
            match raw.parse::<i64>() {
                Ok(parsed) => Value::from(parsed),
                // keep the raw text so validation can point at it
                Err(_) => Value::String(raw),
            }
        } else {
            match raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                Some(parsed) => Value::Number(parsed),
                None => Value::String(raw),
            }
        };
        Msg::Edited {
            pointer: pointer.clone(),
            new_value,
        }
    });
    html! { <input type="number" value={text} {oninput} /> }
}

fn bool_control(ctx: &Context<SchemaForm>, pointer: &str, current: Option<&Value>) -> Html {
    let checked = current.and_then(Value::as_bool).unwrap_or(false);
    let pointer = pointer.to_string();
    let onchange = ctx.link().callback(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::Edited {
            pointer: pointer.clone(),
            new_value: Value::Bool(input.checked()),
        }
    });
    html! { <input type="checkbox" {checked} {onchange} /> }
}

fn select_control(
    ctx: &Context<SchemaForm>,
    pointer: &str,
    options: &[Value],
    current: Option<&Value>,
) -> Html {
    let pointer = pointer.to_string();
    let owned: Vec<Value> = options.to_vec();
    let onchange = ctx.link().callback(move |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        let index = select.selected_index();
        let new_value = if index <= 0 {
            Value::Null
        } else {
            owned.get((index - 1) as usize).cloned().unwrap_or(Value::Null)
        };
        Msg::Edited {
            pointer: pointer.clone(),
            new_value,
        }
    });
    html! {
        <select {onchange}>
            <option selected={current.is_none()}>{"—"}</option>
            {
                options.iter().map(|option| html! {
                    <option selected={current == Some(option)}>
                        { option_label(option) }
                    </option>
                }).collect::<Html>()
            }
        </select>
    }
}

fn json_control(ctx: &Context<SchemaForm>, pointer: &str, current: Option<&Value>) -> Html {
    let text = match current {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => serde_json::to_string_pretty(other).unwrap_or_default(),
    };
    let pointer = pointer.to_string();
    let oninput = ctx.link().callback(move |e: InputEvent| {
        let area: HtmlTextAreaElement = e.target_unchecked_into();
        let raw = area.value();
        // valid JSON goes in typed; anything else stays as text so schema
        // validation can flag it at submission
        let new_value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
        Msg::Edited {
            pointer: pointer.clone(),
            new_value,
        }
    });
    html! { <textarea class="json-editor" rows={6} value={text} {oninput} /> }
}

fn is_long_text(schema: &Value) -> bool {
    matches!(
        schema.get("format").and_then(Value::as_str),
        Some("textarea") | Some("multiline")
    )
}

fn option_label(option: &Value) -> String {
    match option {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
