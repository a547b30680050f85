use serde::{Deserialize, Serialize};

use crate::{
    CUSTOM_FIELDS_KEY, DYNAMIC_FIELDS_KEY, FieldDescriptor, FieldKind, FieldSet, FieldValue,
    FormValues,
};

/// Placeholder shown by select controls without a selection.
pub const SELECT_PLACEHOLDER: &str = "Seleccionar...";

/// Form namespace a control writes back into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldNamespace {
    /// Entity-type custom fields.
    Custom,
    /// Equipment-type indexed fields.
    Dynamic,
}

impl FieldNamespace {
    /// Returns the control id prefix.
    #[must_use]
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::Dynamic => "dynamic",
        }
    }

    /// Returns the record key of the namespace's bag.
    #[must_use]
    pub fn storage_key(&self) -> &'static str {
        match self {
            Self::Custom => CUSTOM_FIELDS_KEY,
            Self::Dynamic => DYNAMIC_FIELDS_KEY,
        }
    }

    /// Returns the section heading.
    #[must_use]
    pub fn section_title(&self) -> &'static str {
        match self {
            Self::Custom => "Campos Personalizados",
            Self::Dynamic => "Campos del tipo de equipo",
        }
    }
}

/// Interactive widget and its current state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Widget {
    /// Single-line text input.
    TextInput {
        /// Current text.
        value: String,
    },
    /// Numeric-only input. Empty text means "unset".
    NumberInput {
        /// Current text.
        value: String,
    },
    /// Date-only input (`YYYY-MM-DD`).
    DateInput {
        /// Current date text.
        value: String,
    },
    /// Single-choice control.
    Select {
        /// Choices in descriptor order.
        options: Vec<String>,
        /// Selected option, only when the stored value matches one.
        selected: Option<String>,
        /// Text shown without a selection.
        placeholder: String,
    },
    /// Boolean toggle.
    Checkbox {
        /// Current state.
        checked: bool,
    },
}

/// One rendered control for a field descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldControl {
    /// Element id, unique per namespace.
    pub id: String,
    /// Name of the field the control writes back to.
    pub field_name: String,
    /// Label, suffixed with ` *` for required fields.
    pub label: String,
    /// Required marker; enforcement belongs to the owning form.
    pub required: bool,
    /// Help text shown inside text and number inputs.
    pub placeholder: Option<String>,
    /// Widget state.
    pub widget: Widget,
}

/// Titled group of controls for one namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSection {
    /// Namespace the controls write into.
    pub namespace: FieldNamespace,
    /// Heading.
    pub title: String,
    /// Controls in descriptor order.
    pub controls: Vec<FieldControl>,
}

/// Maps a descriptor and its stored value to one control.
#[must_use]
pub fn render_field(
    descriptor: &FieldDescriptor,
    current: Option<&FieldValue>,
    namespace: FieldNamespace,
) -> FieldControl {
    let widget = match descriptor.kind() {
        FieldKind::Text => Widget::TextInput {
            value: current.map(FieldValue::display_text).unwrap_or_default(),
        },
        FieldKind::Number => Widget::NumberInput {
            value: match current {
                Some(FieldValue::Number(number)) => number.to_string(),
                Some(FieldValue::Text(text)) => text.clone(),
                _ => String::new(),
            },
        },
        FieldKind::Date => Widget::DateInput {
            value: match current {
                Some(FieldValue::Text(text)) => text.clone(),
                _ => String::new(),
            },
        },
        FieldKind::Select => Widget::Select {
            options: descriptor.options().to_vec(),
            selected: match current {
                Some(FieldValue::Text(text)) if descriptor.options().contains(text) => {
                    Some(text.clone())
                }
                _ => None,
            },
            placeholder: SELECT_PLACEHOLDER.to_owned(),
        },
        FieldKind::Checkbox => Widget::Checkbox {
            checked: matches!(current, Some(FieldValue::Boolean(true))),
        },
    };

    let label = if descriptor.is_required() {
        format!("{} *", descriptor.name())
    } else {
        descriptor.name().to_owned()
    };

    let placeholder = match descriptor.kind() {
        FieldKind::Text | FieldKind::Number => descriptor.description().map(str::to_owned),
        _ => None,
    };

    FieldControl {
        id: format!("{}_{}", namespace.id_prefix(), descriptor.name()),
        field_name: descriptor.name().to_owned(),
        label,
        required: descriptor.is_required(),
        placeholder,
        widget,
    }
}

/// Renders one control per descriptor, in field set order.
#[must_use]
pub fn render_field_set(
    field_set: &FieldSet,
    values: &FormValues,
    namespace: FieldNamespace,
) -> Vec<FieldControl> {
    field_set
        .iter()
        .map(|descriptor| render_field(descriptor, values.get(descriptor.name()), namespace))
        .collect()
}

/// Renders a titled section, or nothing for an empty field set.
#[must_use]
pub fn render_section(
    field_set: &FieldSet,
    values: &FormValues,
    namespace: FieldNamespace,
) -> Option<FieldSection> {
    if field_set.is_empty() {
        return None;
    }

    Some(FieldSection {
        namespace,
        title: namespace.section_title().to_owned(),
        controls: render_field_set(field_set, values, namespace),
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{
        FieldNamespace, SELECT_PLACEHOLDER, Widget, render_field, render_field_set,
        render_section,
    };
    use crate::{
        FieldDescriptor, FieldDescriptorInput, FieldKind, FieldSet, FieldValue, FormValues,
    };

    fn descriptor(name: &str, kind: FieldKind, required: bool, options: &[&str]) -> FieldDescriptor {
        FieldDescriptor::new(FieldDescriptorInput {
            name: name.to_owned(),
            kind,
            required,
            options: options.iter().map(|option| (*option).to_owned()).collect(),
            description: Some("Ayuda".to_owned()),
        })
        .unwrap_or_else(|_| unreachable!())
    }

    fn kind_strategy() -> impl Strategy<Value = FieldKind> {
        prop::sample::select(FieldKind::all().to_vec())
    }

    proptest! {
        #[test]
        fn renders_one_control_per_descriptor_in_order(
            names in prop::collection::btree_set("[A-Za-z]{1,10}", 0..12),
            kinds in prop::collection::vec(kind_strategy(), 12),
        ) {
            let descriptors: Vec<FieldDescriptor> = names
                .iter()
                .zip(kinds.iter())
                .map(|(name, kind)| descriptor(name, *kind, false, &["A", "B"]))
                .collect();
            let field_set = FieldSet::new(descriptors).unwrap_or_else(|_| unreachable!());

            let controls = render_field_set(&field_set, &FormValues::new(), FieldNamespace::Custom);

            prop_assert_eq!(controls.len(), field_set.len());
            for (control, descriptor) in controls.iter().zip(field_set.iter()) {
                prop_assert_eq!(control.field_name.as_str(), descriptor.name());
            }
        }

        #[test]
        fn select_choices_equal_options_in_order(
            options in prop::collection::btree_set("[a-z]{1,8}", 1..8),
        ) {
            let options: Vec<&str> = options.iter().map(String::as_str).collect();
            let control = render_field(
                &descriptor("Opción", FieldKind::Select, false, &options),
                None,
                FieldNamespace::Custom,
            );

            match control.widget {
                Widget::Select { options: rendered, selected, .. } => {
                    prop_assert_eq!(rendered, options.iter().map(|o| (*o).to_owned()).collect::<Vec<_>>());
                    prop_assert!(selected.is_none());
                }
                other => prop_assert!(false, "unexpected widget {:?}", other),
            }
        }
    }

    #[test]
    fn defaults_for_unset_values() {
        let values = FormValues::new();
        let controls = render_field_set(
            &FieldSet::new(vec![
                descriptor("Serie", FieldKind::Text, false, &[]),
                descriptor("RAM", FieldKind::Number, false, &[]),
                descriptor("Compra", FieldKind::Date, false, &[]),
                descriptor("Garantía", FieldKind::Checkbox, false, &[]),
            ])
            .unwrap_or_else(|_| unreachable!()),
            &values,
            FieldNamespace::Dynamic,
        );

        assert_eq!(
            controls.iter().map(|control| control.widget.clone()).collect::<Vec<_>>(),
            vec![
                Widget::TextInput { value: String::new() },
                Widget::NumberInput { value: String::new() },
                Widget::DateInput { value: String::new() },
                Widget::Checkbox { checked: false },
            ]
        );
        assert_eq!(controls[0].id, "dynamic_Serie");
    }

    #[test]
    fn required_label_and_placeholders() {
        let text = render_field(
            &descriptor("Serie", FieldKind::Text, true, &[]),
            Some(&FieldValue::Text("X1".to_owned())),
            FieldNamespace::Custom,
        );
        assert_eq!(text.label, "Serie *");
        assert!(text.required);
        assert_eq!(text.placeholder.as_deref(), Some("Ayuda"));
        assert_eq!(text.widget, Widget::TextInput { value: "X1".to_owned() });

        let date = render_field(
            &descriptor("Compra", FieldKind::Date, false, &[]),
            None,
            FieldNamespace::Custom,
        );
        assert_eq!(date.label, "Compra");
        assert_eq!(date.placeholder, None);
    }

    #[test]
    fn select_only_preselects_matching_value() {
        let select = descriptor("Depto", FieldKind::Select, false, &["IT", "Ventas"]);

        let matching = render_field(
            &select,
            Some(&FieldValue::Text("Ventas".to_owned())),
            FieldNamespace::Custom,
        );
        assert_eq!(
            matching.widget,
            Widget::Select {
                options: vec!["IT".to_owned(), "Ventas".to_owned()],
                selected: Some("Ventas".to_owned()),
                placeholder: SELECT_PLACEHOLDER.to_owned(),
            }
        );

        let stale = render_field(
            &select,
            Some(&FieldValue::Text("Compras".to_owned())),
            FieldNamespace::Custom,
        );
        assert!(matches!(stale.widget, Widget::Select { selected: None, .. }));
    }

    #[test]
    fn number_renders_stored_number_as_text() {
        let control = render_field(
            &descriptor("RAM", FieldKind::Number, false, &[]),
            Some(&FieldValue::Number(16.0)),
            FieldNamespace::Dynamic,
        );
        assert_eq!(control.widget, Widget::NumberInput { value: "16".to_owned() });
    }

    #[test]
    fn empty_field_set_renders_nothing() {
        assert!(
            render_section(&FieldSet::empty(), &FormValues::new(), FieldNamespace::Custom)
                .is_none()
        );
        assert!(
            render_field_set(&FieldSet::empty(), &FormValues::new(), FieldNamespace::Custom)
                .is_empty()
        );
    }
}
