use bigraph_term::Sort;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CtxError>;

#[derive(Debug, Error)]
pub enum CtxError {
    // ------------------------------------------------------------------------
    // Malformed fragment
    // ------------------------------------------------------------------------
    #[error("fragment `{fragment}` declares port `{port}` more than once")]
    DuplicatePort { fragment: String, port: String },

    #[error("fragment `{fragment}` has no root term")]
    MissingRoot { fragment: String },

    #[error("fragment `{fragment}`: outer site `{port}` has no bound site term")]
    UnboundOuterSite { fragment: String, port: String },

    #[error(
        "fragment `{fragment}`: root references `{reference}`, which is neither a bound site nor a bound edge"
    )]
    RootOutOfScope { fragment: String, reference: String },

    #[error("fragment `{fragment}`: layer {layer} references `{reference}` before it is bound")]
    LayerOutOfScope {
        fragment: String,
        layer: usize,
        reference: String,
    },

    // ------------------------------------------------------------------------
    // Malformed interface
    // ------------------------------------------------------------------------
    #[error("malformed interface: {detail}")]
    MalformedInterface { detail: String },

    // ------------------------------------------------------------------------
    // Composition
    // ------------------------------------------------------------------------
    #[error("interface has no `{mapping}` entry for port `{port}` of `{fragment}`")]
    UncoupledPort {
        mapping: &'static str,
        fragment: String,
        port: String,
    },

    #[error("fragment `{fragment}` declares no {role} `{port}`")]
    UnresolvedPort {
        fragment: String,
        role: &'static str,
        port: String,
    },

    // ------------------------------------------------------------------------
    // Grounding
    // ------------------------------------------------------------------------
    #[error("fragment `{fragment}` is not closed; open outer links: {links:?}")]
    NotClosed { fragment: String, links: Vec<String> },

    #[error("grounding `{fragment}`: no value supplied for `{port}`")]
    MissingArgument { fragment: String, port: String },

    #[error("grounding `{fragment}`: `{port}` expects a {expected} value, got {found}")]
    SortMismatch {
        fragment: String,
        port: String,
        expected: Sort,
        found: Sort,
    },

    #[error("grounding `{fragment}` left a symbolic residual: {residual}")]
    Unresolved { fragment: String, residual: String },

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------
    #[error("invalid naming config: {0}")]
    Config(#[from] serde_json::Error),
}
