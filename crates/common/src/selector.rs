//! Template and motor type selection

/// The template/motor-type pair that keys field retrieval
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSelection {
    template_id: Option<String>,
    motor_type_id: Option<String>,
}

impl TemplateSelection {
    pub fn new(template_id: impl Into<String>, motor_type_id: impl Into<String>) -> Self {
        let mut selection = Self::default();
        selection.select_template(template_id);
        selection.select_motor_type(motor_type_id);
        selection
    }

    pub fn select_template(&mut self, template_id: impl Into<String>) {
        self.template_id = non_blank(template_id.into());
    }

    pub fn select_motor_type(&mut self, motor_type_id: impl Into<String>) {
        self.motor_type_id = non_blank(motor_type_id.into());
    }

    pub fn template_id(&self) -> Option<&str> {
        self.template_id.as_deref()
    }

    pub fn motor_type_id(&self) -> Option<&str> {
        self.motor_type_id.as_deref()
    }

    /// Both ids, or `None` while either is unset
    pub fn request(&self) -> Option<(&str, &str)> {
        Some((self.template_id.as_deref()?, self.motor_type_id.as_deref()?))
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_requires_both() {
        let mut selection = TemplateSelection::default();
        assert_eq!(selection.request(), None);

        selection.select_template("template1");
        assert_eq!(selection.request(), None);

        selection.select_motor_type("type1");
        assert_eq!(selection.request(), Some(("template1", "type1")));

        selection.select_template(" ");
        assert_eq!(selection.request(), None);
    }
}
