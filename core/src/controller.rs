/// A group of handlers that can be mounted under a path prefix.
///
/// Implemented by the `#[controller]` attribute macro from `docathome_macros`,
/// which collects every `#[get]`/`#[post]`/... method of the impl block.
pub trait Controller {
    /// Router holding every handler of the group, relative to its prefix.
    fn router() -> axum::Router;

    /// OpenAPI description of the handlers, relative to the group prefix.
    fn openapi() -> utoipa::openapi::OpenApi;
}
