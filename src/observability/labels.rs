use metrics::{IntoLabels, Label, SharedString};

/// Base labels attached to every counter an [crate::AccountParser] registers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Labels(Vec<Label>);

pub const NO_LABEL: Labels = Labels(vec![]);

impl Labels {
    pub fn new(
        labels: &[(
            impl Into<SharedString> + Clone,
            impl Into<SharedString> + Clone,
        )],
    ) -> Self {
        Labels(labels.iter().map(Label::from).collect())
    }

    /// A copy of these labels with `key` set to `value`
    pub fn with(&self, key: &'static str, value: &'static str) -> Labels {
        let mut labels = self.0.clone();
        labels.push(Label::from_static_parts(key, value));
        Labels(labels)
    }
}

impl IntoLabels for Labels {
    fn into_labels(self) -> Vec<Label> {
        self.0
    }
}
