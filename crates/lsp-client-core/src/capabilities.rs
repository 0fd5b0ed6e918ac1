//! The default client capability document advertised at `initialize` time.

use lsp_types::{
    CallHierarchyClientCapabilities, ClientCapabilities, CompletionClientCapabilities,
    CompletionItemCapability, CompletionItemKind, CompletionItemKindCapability,
    DocumentSymbolClientCapabilities, DynamicRegistrationClientCapabilities,
    FoldingRangeClientCapabilities, GotoCapability, HoverClientCapabilities,
    InlayHintClientCapabilities, MarkupKind, ParameterInformationSettings,
    PublishDiagnosticsClientCapabilities, RenameClientCapabilities,
    ShowMessageRequestClientCapabilities, SignatureHelpClientCapabilities,
    SignatureInformationSettings, SymbolKind, SymbolKindCapability,
    TextDocumentClientCapabilities, TextDocumentSyncClientCapabilities, WindowClientCapabilities,
    WorkspaceClientCapabilities, WorkspaceSymbolClientCapabilities,
};

const COMPLETION_ITEM_KINDS: &[CompletionItemKind] = &[
    CompletionItemKind::TEXT,
    CompletionItemKind::METHOD,
    CompletionItemKind::FUNCTION,
    CompletionItemKind::CONSTRUCTOR,
    CompletionItemKind::FIELD,
    CompletionItemKind::VARIABLE,
    CompletionItemKind::CLASS,
    CompletionItemKind::INTERFACE,
    CompletionItemKind::MODULE,
    CompletionItemKind::PROPERTY,
    CompletionItemKind::UNIT,
    CompletionItemKind::VALUE,
    CompletionItemKind::ENUM,
    CompletionItemKind::KEYWORD,
    CompletionItemKind::SNIPPET,
    CompletionItemKind::COLOR,
    CompletionItemKind::FILE,
    CompletionItemKind::REFERENCE,
    CompletionItemKind::FOLDER,
    CompletionItemKind::ENUM_MEMBER,
    CompletionItemKind::CONSTANT,
    CompletionItemKind::STRUCT,
    CompletionItemKind::EVENT,
    CompletionItemKind::OPERATOR,
    CompletionItemKind::TYPE_PARAMETER,
];

const SYMBOL_KINDS: &[SymbolKind] = &[
    SymbolKind::FILE,
    SymbolKind::MODULE,
    SymbolKind::NAMESPACE,
    SymbolKind::PACKAGE,
    SymbolKind::CLASS,
    SymbolKind::METHOD,
    SymbolKind::PROPERTY,
    SymbolKind::FIELD,
    SymbolKind::CONSTRUCTOR,
    SymbolKind::ENUM,
    SymbolKind::INTERFACE,
    SymbolKind::FUNCTION,
    SymbolKind::VARIABLE,
    SymbolKind::CONSTANT,
    SymbolKind::STRING,
    SymbolKind::NUMBER,
    SymbolKind::BOOLEAN,
    SymbolKind::ARRAY,
    SymbolKind::OBJECT,
    SymbolKind::KEY,
    SymbolKind::NULL,
    SymbolKind::ENUM_MEMBER,
    SymbolKind::STRUCT,
    SymbolKind::EVENT,
    SymbolKind::OPERATOR,
    SymbolKind::TYPE_PARAMETER,
];

fn dynamic_registration() -> DynamicRegistrationClientCapabilities {
    DynamicRegistrationClientCapabilities {
        dynamic_registration: Some(true),
    }
}

/// Builds the capability document this core advertises at `initialize` time
/// by default. The embedder may replace it wholesale via
/// [`crate::config::SessionConfig::capabilities`].
pub fn default_capabilities() -> ClientCapabilities {
    ClientCapabilities {
        text_document: Some(TextDocumentClientCapabilities {
            synchronization: Some(TextDocumentSyncClientCapabilities {
                dynamic_registration: Some(true),
                did_save: Some(true),
                will_save: None,
                will_save_wait_until: None,
            }),
            publish_diagnostics: Some(PublishDiagnosticsClientCapabilities {
                related_information: Some(true),
                ..Default::default()
            }),
            completion: Some(CompletionClientCapabilities {
                dynamic_registration: Some(true),
                completion_item: Some(CompletionItemCapability {
                    snippet_support: Some(false),
                    ..Default::default()
                }),
                completion_item_kind: Some(CompletionItemKindCapability {
                    value_set: Some(COMPLETION_ITEM_KINDS.to_vec()),
                }),
                ..Default::default()
            }),
            hover: Some(HoverClientCapabilities {
                dynamic_registration: Some(true),
                content_format: Some(vec![MarkupKind::Markdown, MarkupKind::PlainText]),
            }),
            folding_range: Some(FoldingRangeClientCapabilities {
                dynamic_registration: Some(true),
                ..Default::default()
            }),
            inlay_hint: Some(InlayHintClientCapabilities {
                dynamic_registration: Some(true),
                resolve_support: None,
            }),
            definition: Some(GotoCapability {
                dynamic_registration: Some(true),
                link_support: Some(true),
            }),
            signature_help: Some(SignatureHelpClientCapabilities {
                dynamic_registration: Some(true),
                signature_information: Some(SignatureInformationSettings {
                    documentation_format: Some(vec![MarkupKind::Markdown, MarkupKind::PlainText]),
                    parameter_information: Some(ParameterInformationSettings {
                        label_offset_support: Some(false),
                    }),
                    active_parameter_support: None,
                }),
                context_support: None,
            }),
            implementation: Some(GotoCapability {
                dynamic_registration: Some(true),
                link_support: Some(true),
            }),
            references: Some(dynamic_registration()),
            call_hierarchy: Some(CallHierarchyClientCapabilities {
                dynamic_registration: Some(true),
            }),
            declaration: Some(GotoCapability {
                dynamic_registration: Some(true),
                link_support: Some(true),
            }),
            type_definition: Some(GotoCapability {
                dynamic_registration: Some(true),
                link_support: Some(true),
            }),
            formatting: Some(dynamic_registration()),
            range_formatting: Some(dynamic_registration()),
            rename: Some(RenameClientCapabilities {
                dynamic_registration: Some(true),
                ..Default::default()
            }),
            document_symbol: Some(DocumentSymbolClientCapabilities {
                dynamic_registration: Some(true),
                hierarchical_document_symbol_support: Some(true),
                symbol_kind: Some(SymbolKindCapability {
                    value_set: Some(SYMBOL_KINDS.to_vec()),
                }),
                ..Default::default()
            }),
            ..Default::default()
        }),
        window: Some(WindowClientCapabilities {
            show_message: Some(ShowMessageRequestClientCapabilities {
                message_action_item: None,
            }),
            work_done_progress: Some(true),
            ..Default::default()
        }),
        workspace: Some(WorkspaceClientCapabilities {
            symbol: Some(WorkspaceSymbolClientCapabilities {
                dynamic_registration: Some(true),
                symbol_kind: Some(SymbolKindCapability {
                    value_set: Some(SYMBOL_KINDS.to_vec()),
                }),
                ..Default::default()
            }),
            workspace_folders: Some(true),
            configuration: Some(true),
            did_change_configuration: Some(dynamic_registration()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advertises_completion_item_kinds_one_through_twenty_five() {
        let caps = default_capabilities();
        let kinds = caps
            .text_document
            .unwrap()
            .completion
            .unwrap()
            .completion_item_kind
            .unwrap()
            .value_set
            .unwrap();
        assert_eq!(kinds.len(), 25);
    }

    #[test]
    fn advertises_symbol_kinds_one_through_twenty_six() {
        let caps = default_capabilities();
        let kinds = caps
            .text_document
            .unwrap()
            .document_symbol
            .unwrap()
            .symbol_kind
            .unwrap()
            .value_set
            .unwrap();
        assert_eq!(kinds.len(), 26);
    }
}
