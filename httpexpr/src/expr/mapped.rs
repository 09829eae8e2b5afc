use crate::expr::AttributeExpr;

/// Decode the attribute and element name held in `encoded`.
///
/// The encoding is a plain "attribute:element" notation that maps a header,
/// parameter, or body field name onto the underlying attribute. The element
/// part is optional; without it both names are the token itself. Only the
/// first `:` splits; anything after it, further colons included, belongs to
/// the element name.
pub fn name_map(encoded: &str) -> (&str, &str) {
    match encoded.split_once(':') {
        Some((attribute, element)) => (attribute, element),
        None => (encoded, encoded),
    }
}

/// A merge-aware view over an object-typed [AttributeExpr] whose field names
/// may use the `attribute:element` encoding. Field names are decoded once at
/// construction; merging layers another view underneath this one by decoded
/// attribute name.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct MappedAttribute {
    attribute: AttributeExpr,
    mappings: Vec<(String, String)>,
}

impl MappedAttribute {
    pub fn new(encoded: &AttributeExpr) -> Self {
        let mut attribute = AttributeExpr::object();
        attribute.description = encoded.description.clone();
        attribute.metadata = encoded.metadata.clone();
        let mut mappings: Vec<(String, String)> = Vec::new();
        for field in encoded.fields() {
            let (attribute_name, element_name) = name_map(&field.name);
            attribute.set(attribute_name, field.attribute.clone());
            match mappings
                .iter_mut()
                .find(|(name, _)| name.as_str() == attribute_name)
            {
                Some((_, element)) => *element = element_name.to_string(),
                None => mappings.push((attribute_name.to_string(), element_name.to_string())),
            }
        }
        Self {
            attribute,
            mappings,
        }
    }

    /// The underlying attribute container, field names decoded.
    pub fn attribute(&self) -> &AttributeExpr {
        &self.attribute
    }

    /// The external (header, query, or path) element name mapped to
    /// `attribute_name`. Defaults to the attribute name itself when no
    /// mapping was declared.
    pub fn element_name<'a>(&'a self, attribute_name: &'a str) -> &'a str {
        self.mappings
            .iter()
            .find(|(name, _)| name == attribute_name)
            .map_or(attribute_name, |(_, element)| element.as_str())
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attribute.field_names()
    }

    pub fn is_empty(&self) -> bool {
        self.attribute.is_empty()
    }

    /// Layer `base` underneath this view: entries of `base` whose attribute
    /// name is not declared here are appended, in `base` order. Declarations
    /// already present win.
    pub fn merge(&mut self, base: &MappedAttribute) {
        for field in base.attribute.fields() {
            if self.attribute.get(&field.name).is_none() {
                self.attribute.set(&field.name, field.attribute.clone());
                self.mappings.push((
                    field.name.clone(),
                    base.element_name(&field.name).to_string(),
                ));
            }
        }
    }
}

/// Layer `base`'s fields underneath `target`, comparing by decoded attribute
/// name: fields of `base` not declared on `target` are appended in `base`
/// order, keeping their encoded names so later mapped views still see the
/// element mapping. Used to fold parent declarations into a child container.
pub fn inherit(target: &mut AttributeExpr, base: &AttributeExpr) {
    let declared: Vec<String> = target
        .field_names()
        .map(|name| name_map(name).0.to_string())
        .collect();
    for field in base.fields() {
        let (attribute_name, _) = name_map(&field.name);
        if !declared.iter().any(|name| name == attribute_name) {
            target.set(&field.name, field.attribute.clone());
        }
    }
}
