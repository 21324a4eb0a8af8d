//! Standard component catalogue: ten basic inputs and two layout containers.

use crate::component::{
    Category, ComponentDescriptor, EditorKind, PropertySchema, RendererRef, SelectOption,
};
use crate::registry::ComponentRegistry;
use serde_json::{json, Value as JsonValue};

/// Renderer for tab containers in the designer canvas
pub const TABS_RENDERER: &str = "TabsComponent";

/// Renderer for row containers in the designer canvas
pub const ROW_RENDERER: &str = "RowContainer";

pub fn register_builtin_components(registry: &mut ComponentRegistry) {
    registry.register_all(builtin_components());
}

/// Every built-in descriptor with its renderer, in palette order
pub fn builtin_components() -> Vec<(ComponentDescriptor, Option<RendererRef>)> {
    vec![
        (text(), None),
        (textarea(), None),
        (number(), None),
        (select(), None),
        (radio(), None),
        (checkbox(), None),
        (date(), None),
        (datetime(), None),
        (file(), None),
        (photo(), None),
        (tabs(), Some(RendererRef::new(TABS_RENDERER))),
        (row(), Some(RendererRef::new(ROW_RENDERER))),
    ]
}

fn sample_options() -> JsonValue {
    json!([
        {"label": "Option 1", "value": "option1"},
        {"label": "Option 2", "value": "option2"},
        {"label": "Option 3", "value": "option3"}
    ])
}

fn choices(pairs: &[(&str, &str)]) -> Vec<SelectOption> {
    pairs
        .iter()
        .map(|(label, value)| SelectOption::new(*label, *value))
        .collect()
}

fn length_limits(descriptor: ComponentDescriptor) -> ComponentDescriptor {
    descriptor
        .property(PropertySchema::new("maxLength", "Max Length", EditorKind::Number).min(0.0))
        .property(PropertySchema::new("minLength", "Min Length", EditorKind::Number).min(0.0))
}

fn text() -> ComponentDescriptor {
    let descriptor = ComponentDescriptor::new("text", "Text Input", Category::Basic)
        .description("Single line text input")
        .icon("Edit")
        .label("Text Input")
        .field("input")
        .placeholder("Please enter")
        .component_name("el-input")
        .default_prop("inputType", "text")
        .default_prop("clearable", true)
        .default_prop("showWordLimit", false)
        .default_prop("showPassword", false)
        .default_prop("maxLength", JsonValue::Null)
        .default_prop("minLength", JsonValue::Null)
        .property(
            PropertySchema::new("inputType", "Input Type", EditorKind::Select).options(choices(&[
                ("Text", "text"),
                ("Password", "password"),
                ("Email", "email"),
                ("Phone", "tel"),
                ("URL", "url"),
            ])),
        )
        .property(PropertySchema::new("clearable", "Clearable", EditorKind::Switch))
        .property(PropertySchema::new("showWordLimit", "Show Word Count", EditorKind::Switch))
        .property(PropertySchema::new("showPassword", "Password Toggle", EditorKind::Switch));
    length_limits(descriptor)
}

fn textarea() -> ComponentDescriptor {
    let descriptor = ComponentDescriptor::new("textarea", "Text Area", Category::Basic)
        .description("Multi-line text input")
        .icon("Document")
        .label("Text Area")
        .field("textarea")
        .placeholder("Please enter")
        .component_name("el-input")
        .default_prop("type", "textarea")
        .default_prop("rows", 4)
        .default_prop("showWordLimit", false)
        .default_prop("resize", "vertical")
        .default_prop("maxLength", JsonValue::Null)
        .default_prop("minLength", JsonValue::Null)
        .property(
            PropertySchema::new("rows", "Rows", EditorKind::Number)
                .min(2.0)
                .max(20.0),
        )
        .property(PropertySchema::new("showWordLimit", "Show Word Count", EditorKind::Switch))
        .property(
            PropertySchema::new("resize", "Resize", EditorKind::Select).options(choices(&[
                ("None", "none"),
                ("Vertical", "vertical"),
                ("Horizontal", "horizontal"),
                ("Both", "both"),
            ])),
        );
    length_limits(descriptor)
}

fn number() -> ComponentDescriptor {
    ComponentDescriptor::new("number", "Number Input", Category::Basic)
        .description("Numeric input")
        .icon("Tickets")
        .label("Number Input")
        .field("number")
        .placeholder("Please enter a number")
        .component_name("el-input-number")
        .default_prop("min", JsonValue::Null)
        .default_prop("max", JsonValue::Null)
        .default_prop("step", 1)
        .default_prop("precision", JsonValue::Null)
        .default_prop("controls", true)
        .default_prop("controlsPosition", "right")
        .property(PropertySchema::new("min", "Minimum", EditorKind::Number))
        .property(PropertySchema::new("max", "Maximum", EditorKind::Number))
        .property(PropertySchema::new("step", "Step", EditorKind::Number).min(0.01))
        .property(
            PropertySchema::new("precision", "Precision", EditorKind::Number)
                .min(0.0)
                .max(10.0),
        )
        .property(PropertySchema::new("controls", "Show Controls", EditorKind::Switch))
        .property(
            PropertySchema::new("controlsPosition", "Controls Position", EditorKind::Select)
                .options(choices(&[("Right", "right"), ("Both Sides", "")])),
        )
}

fn select() -> ComponentDescriptor {
    ComponentDescriptor::new("select", "Dropdown", Category::Basic)
        .description("Dropdown selector")
        .icon("ArrowDown")
        .label("Dropdown")
        .field("select")
        .placeholder("Please select")
        .component_name("el-select")
        .default_prop("multiple", false)
        .default_prop("clearable", true)
        .default_prop("filterable", false)
        .default_prop("options", sample_options())
        .property(PropertySchema::new("multiple", "Multiple", EditorKind::Switch))
        .property(PropertySchema::new("clearable", "Clearable", EditorKind::Switch))
        .property(PropertySchema::new("filterable", "Filterable", EditorKind::Switch))
        .property(PropertySchema::new("options", "Options", EditorKind::Options))
}

fn radio() -> ComponentDescriptor {
    ComponentDescriptor::new("radio", "Radio", Category::Basic)
        .description("Radio button group")
        .icon("CircleCheck")
        .label("Radio")
        .field("radio")
        .component_name("el-radio-group")
        .default_prop("options", sample_options())
        .property(PropertySchema::new("options", "Options", EditorKind::Options))
}

fn checkbox() -> ComponentDescriptor {
    ComponentDescriptor::new("checkbox", "Checkbox", Category::Basic)
        .description("Checkbox group")
        .icon("Select")
        .label("Checkbox")
        .field("checkbox")
        .component_name("el-checkbox-group")
        .default_prop("options", sample_options())
        .property(PropertySchema::new("options", "Options", EditorKind::Options))
}

fn date() -> ComponentDescriptor {
    ComponentDescriptor::new("date", "Date Picker", Category::Basic)
        .description("Date picker")
        .icon("Calendar")
        .label("Date Picker")
        .field("date")
        .placeholder("Please pick a date")
        .component_name("el-date-picker")
        .default_prop("type", "date")
        .default_prop("clearable", true)
        .default_prop("format", "YYYY-MM-DD")
        .default_prop("valueFormat", "YYYY-MM-DD")
        .property(
            PropertySchema::new("type", "Picker Type", EditorKind::Select).options(choices(&[
                ("Date", "date"),
                ("Date Time", "datetime"),
                ("Date Range", "daterange"),
                ("Date Time Range", "datetimerange"),
                ("Month", "month"),
                ("Year", "year"),
            ])),
        )
        .property(PropertySchema::new("clearable", "Clearable", EditorKind::Switch))
        .property(
            PropertySchema::new("format", "Display Format", EditorKind::Input)
                .placeholder("YYYY-MM-DD"),
        )
        .property(
            PropertySchema::new("valueFormat", "Value Format", EditorKind::Input)
                .placeholder("YYYY-MM-DD"),
        )
}

fn datetime() -> ComponentDescriptor {
    ComponentDescriptor::new("datetime", "Date Time Picker", Category::Basic)
        .description("Date and time picker")
        .icon("Timer")
        .label("Date Time Picker")
        .field("datetime")
        .placeholder("Please pick a date and time")
        .component_name("el-date-picker")
        .default_prop("type", "datetime")
        .default_prop("clearable", true)
        .default_prop("format", "YYYY-MM-DD HH:mm")
        .default_prop("valueFormat", "YYYY-MM-DD HH:mm")
        .property(PropertySchema::new("clearable", "Clearable", EditorKind::Switch))
        .property(
            PropertySchema::new("format", "Display Format", EditorKind::Input)
                .placeholder("YYYY-MM-DD HH:mm"),
        )
        .property(
            PropertySchema::new("valueFormat", "Value Format", EditorKind::Input)
                .placeholder("YYYY-MM-DD HH:mm"),
        )
}

fn file() -> ComponentDescriptor {
    ComponentDescriptor::new("file", "File Upload", Category::Basic)
        .description("File upload")
        .icon("Upload")
        .label("File Upload")
        .field("file")
        .placeholder("Please choose a file to upload")
        .component_name("FileUpLoader")
        .default_prop("max", 1)
        .property(
            PropertySchema::new("fileAccept", "Accepted Files", EditorKind::Select).options(
                choices(&[
                    ("Documents", ".doc,.docx,.xls,.xlsx,.ppt,.pptx,.pdf"),
                    ("Images", ".jpg,.png,.gif"),
                    ("Videos", ".mp4,.avi,.rmvb"),
                    ("Audio", ".mp3,.wav"),
                    ("Archives", ".rar,.zip"),
                ]),
            ),
        )
        .property(PropertySchema::new("max", "Max Files", EditorKind::Number))
}

fn photo() -> ComponentDescriptor {
    ComponentDescriptor::new("photo", "Image Upload", Category::Basic)
        .description("Image upload")
        .icon("Picture")
        .label("Image Upload")
        .field("photo")
        .placeholder("Please choose an image to upload")
        .component_name("ImageUploader")
        .default_prop("max", 1)
        .property(PropertySchema::new("max", "Max Files", EditorKind::Number))
}

fn tabs() -> ComponentDescriptor {
    ComponentDescriptor::new("tabs", "Tabs", Category::Layout)
        .description("Tabbed container")
        .icon("CollectionTag")
        .default_prop(
            "tabs",
            json!([
                {"label": "Tab 1", "children": []},
                {"label": "Tab 2", "children": []},
                {"label": "Tab 3", "children": []}
            ]),
        )
        .property(PropertySchema::new("tabs", "Tabs", EditorKind::Tabs))
}

fn row() -> ComponentDescriptor {
    ComponentDescriptor::new("row", "Row", Category::Layout)
        .description("Row layout container on a 24 column grid")
        .icon("Grid")
        .label("Row")
        .default_prop("gutter", 16)
        .default_prop("children", json!([]))
        .property(
            PropertySchema::new("gutter", "Gutter", EditorKind::Number)
                .min(0.0)
                .max(48.0),
        )
        .property(PropertySchema::new("label", "Title", EditorKind::Input).placeholder("Row"))
}
