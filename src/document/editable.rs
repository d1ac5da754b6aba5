use super::{DocumentEditor, DocumentError, EditAction, EditTarget, SpanRegion, TextSpan};
use crate::model::{
    Attribute, Container, Member, MemberData, Model, SourceGraph, UsingStatement,
};

/// Edit intents available on models loaded from a document.
///
/// Every operation checks that the model came from a document before calling the editor,
/// and editor errors come back unchanged.
pub trait Editable: Model {
    /// Whether the model has a body that body-level edits can address.
    fn has_editable_body(&self) -> bool {
        false
    }

    fn edit_target(&self) -> Result<EditTarget, DocumentError> {
        let document = self
            .source_document()
            .ok_or_else(|| DocumentError::NoDocument {
                path: self.lookup_path().clone(),
            })?;
        Ok(EditTarget {
            document: document.to_path_buf(),
            path: self.lookup_path().clone(),
            kind: self.model_kind(),
        })
    }

    fn edit<E: DocumentEditor + ?Sized>(
        &self,
        editor: &E,
        action: EditAction,
    ) -> Result<SourceGraph, DocumentError> {
        let target = self.edit_target()?;
        if action.touches_body() && !self.has_editable_body() {
            return Err(DocumentError::Unsupported {
                kind: target.kind,
                action: action.as_str(),
            });
        }
        tracing::debug!(path = %target.path, action = %action, "applying document edit");
        editor.apply(&target, action)
    }

    fn insert_before<E: DocumentEditor + ?Sized>(
        &self,
        editor: &E,
        text: &str,
    ) -> Result<SourceGraph, DocumentError> {
        self.edit(editor, EditAction::InsertBefore(text.to_string()))
    }

    fn insert_after<E: DocumentEditor + ?Sized>(
        &self,
        editor: &E,
        text: &str,
    ) -> Result<SourceGraph, DocumentError> {
        self.edit(editor, EditAction::InsertAfter(text.to_string()))
    }

    fn insert_at_body_start<E: DocumentEditor + ?Sized>(
        &self,
        editor: &E,
        text: &str,
    ) -> Result<SourceGraph, DocumentError> {
        self.edit(editor, EditAction::InsertAtBodyStart(text.to_string()))
    }

    fn insert_at_body_end<E: DocumentEditor + ?Sized>(
        &self,
        editor: &E,
        text: &str,
    ) -> Result<SourceGraph, DocumentError> {
        self.edit(editor, EditAction::InsertAtBodyEnd(text.to_string()))
    }

    fn replace_body<E: DocumentEditor + ?Sized>(
        &self,
        editor: &E,
        text: &str,
    ) -> Result<SourceGraph, DocumentError> {
        self.edit(editor, EditAction::ReplaceBody(text.to_string()))
    }

    fn delete_body<E: DocumentEditor + ?Sized>(
        &self,
        editor: &E,
    ) -> Result<SourceGraph, DocumentError> {
        self.edit(editor, EditAction::DeleteBody)
    }

    fn replace<E: DocumentEditor + ?Sized>(
        &self,
        editor: &E,
        text: &str,
    ) -> Result<SourceGraph, DocumentError> {
        self.edit(editor, EditAction::Replace(text.to_string()))
    }

    fn delete<E: DocumentEditor + ?Sized>(&self, editor: &E) -> Result<SourceGraph, DocumentError> {
        self.edit(editor, EditAction::Delete)
    }

    fn definition_span<E: DocumentEditor + ?Sized>(
        &self,
        editor: &E,
    ) -> Result<TextSpan, DocumentError> {
        editor.locate(&self.edit_target()?, SpanRegion::Definition)
    }

    fn body_span<E: DocumentEditor + ?Sized>(&self, editor: &E) -> Result<TextSpan, DocumentError> {
        let target = self.edit_target()?;
        if !self.has_editable_body() {
            return Err(DocumentError::Unsupported {
                kind: target.kind,
                action: "body_span",
            });
        }
        editor.locate(&target, SpanRegion::Body)
    }
}

impl Editable for Container {
    fn has_editable_body(&self) -> bool {
        true
    }
}

impl Editable for Member {
    fn has_editable_body(&self) -> bool {
        match self.data() {
            MemberData::Method(method) => method.has_body,
            MemberData::Property(_) => true,
            MemberData::Field(_) | MemberData::Event(_) => false,
        }
    }
}

impl Editable for Attribute {}

impl Editable for UsingStatement {}
