use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{
    parse_macro_input, Attribute, FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, LitInt, LitStr,
    Meta, Type,
};

const HTTP_METHODS: [&str; 5] = ["get", "post", "put", "delete", "patch"];

/// Turns an impl block of handlers into a route group.
///
/// Every associated function carrying `#[get("/path")]` (or `post`, `put`,
/// `delete`, `patch`) is registered on the router returned by
/// `docathome_core::controller::Controller::router`. An OpenAPI struct named
/// `<Type>Api` is generated next to the impl block and returned by
/// `Controller::openapi`.
///
/// ```rust,ignore
/// pub struct DoctorController;
///
/// #[controller]
/// impl DoctorController {
///     #[get("/status")]
///     #[utoipa_response(status = 200, body = GroupStatus)]
///     async fn status() -> Json<GroupStatus> { ... }
/// }
/// ```
#[proc_macro_attribute]
pub fn controller(_args: TokenStream, input: TokenStream) -> TokenStream {
    let impl_block = parse_macro_input!(input as ItemImpl);

    match expand_controller(impl_block) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_controller(impl_block: ItemImpl) -> syn::Result<TokenStream2> {
    let self_ty = &impl_block.self_ty;
    let struct_name = match &**self_ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.clone())
            .ok_or_else(|| syn::Error::new(self_ty.span(), "expected a named type"))?,
        _ => return Err(syn::Error::new(impl_block.span(), "expected a struct type")),
    };

    let mut routes = Vec::new();
    for item in &impl_block.items {
        if let ImplItem::Fn(method) = item {
            if let Some(route) = Route::from_method(method)? {
                routes.push(route);
            }
        }
    }

    let registrations = routes.iter().map(|route| {
        let method = &route.method;
        let path = &route.path;
        let handler = &route.handler;
        quote! { .route(#path, axum::routing::#method(#self_ty::#handler)) }
    });

    let doc_wrappers = routes
        .iter()
        .map(|route| route.doc_wrapper(&struct_name))
        .collect::<Vec<_>>();
    let wrapper_names = routes.iter().map(Route::wrapper_name).collect::<Vec<_>>();

    let mut seen = std::collections::HashSet::new();
    let schemas = routes
        .iter()
        .flat_map(|route| route.responses.iter().filter_map(|r| r.body.clone()))
        .filter(|ty| seen.insert(quote!(#ty).to_string()))
        .collect::<Vec<_>>();

    let components = if schemas.is_empty() {
        quote! {}
    } else {
        quote! { , components(schemas(#(#schemas),*)) }
    };

    let api_struct_name = format_ident!("{}Api", struct_name);

    Ok(quote! {
        #impl_block

        impl docathome_core::controller::Controller for #self_ty {
            fn router() -> axum::Router {
                axum::Router::new()
                    #(#registrations)*
            }

            fn openapi() -> utoipa::openapi::OpenApi {
                <#api_struct_name as utoipa::OpenApi>::openapi()
            }
        }

        #(#doc_wrappers)*

        #[derive(utoipa::OpenApi)]
        #[openapi(paths(#(#wrapper_names),*) #components)]
        pub struct #api_struct_name;
    })
}

/// One handler found in a controller impl block.
struct Route {
    method: Ident,
    path: LitStr,
    handler: Ident,
    responses: Vec<ResponseDoc>,
    signature: ImplItemFn,
}

impl Route {
    fn from_method(method: &ImplItemFn) -> syn::Result<Option<Self>> {
        let Some((verb, path)) = route_attr(&method.attrs)? else {
            return Ok(None);
        };

        if let Some(receiver) = method
            .sig
            .inputs
            .iter()
            .find(|input| matches!(input, FnArg::Receiver(_)))
        {
            return Err(syn::Error::new(
                receiver.span(),
                "controller handlers must be associated functions without `self`",
            ));
        }

        let responses = method
            .attrs
            .iter()
            .filter(|attr| last_segment_is(attr, "utoipa_response"))
            .map(|attr| attr.parse_args::<ResponseDoc>())
            .collect::<syn::Result<Vec<_>>>()?;

        Ok(Some(Route {
            method: format_ident!("{}", verb),
            path,
            handler: method.sig.ident.clone(),
            responses,
            signature: method.clone(),
        }))
    }

    fn wrapper_name(&self) -> Ident {
        format_ident!("__utoipa_path_{}", self.handler)
    }

    /// Module-level copy of the handler signature carrying `#[utoipa::path]`.
    /// utoipa cannot document methods inside an impl block, so the docs are
    /// generated from this stand-in; it is never called.
    fn doc_wrapper(&self, struct_name: &Ident) -> TokenStream2 {
        let wrapper = self.wrapper_name();
        let method = &self.method;
        let path = &self.path;
        let operation_id = format!("{}::{}", struct_name, self.handler);
        let tag = struct_name.to_string();

        let sig = &self.signature.sig;
        let vis = &self.signature.vis;
        let asyncness = &sig.asyncness;
        let inputs = &sig.inputs;
        let output = &sig.output;
        let generics = &sig.generics;
        let where_clause = &sig.generics.where_clause;

        let responses = if self.responses.is_empty() {
            quote! {}
        } else {
            let items = self.responses.iter().map(ResponseDoc::to_tokens);
            quote! { , responses(#(#items),*) }
        };

        quote! {
            #[doc(hidden)]
            #[allow(dead_code, unused_variables, non_snake_case)]
            #[utoipa::path(#method, path = #path, operation_id = #operation_id, tag = #tag #responses)]
            #vis #asyncness fn #wrapper #generics(#inputs) #output #where_clause {
                unreachable!("documentation-only handler")
            }
        }
    }
}

fn last_segment_is(attr: &Attribute, name: &str) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == name)
}

/// Finds `#[get("/path")]` style attributes, with or without the crate path.
fn route_attr(attrs: &[Attribute]) -> syn::Result<Option<(String, LitStr)>> {
    for attr in attrs {
        let Some(segment) = attr.path().segments.last() else {
            continue;
        };
        let verb = segment.ident.to_string();
        if !HTTP_METHODS.contains(&verb.as_str()) {
            continue;
        }

        let Meta::List(list) = &attr.meta else {
            return Err(syn::Error::new(
                attr.span(),
                format!("expected #[{verb}(\"/path\")]"),
            ));
        };
        let path = syn::parse2::<LitStr>(list.tokens.clone())?;
        if !path.value().starts_with('/') {
            return Err(syn::Error::new(path.span(), "route paths must start with `/`"));
        }

        return Ok(Some((verb, path)));
    }

    Ok(None)
}

/// Parsed `#[utoipa_response(...)]` arguments.
///
/// Accepts either a bare type (`#[utoipa_response(User)]`, status 200) or
/// `status = 404, body = Message, description = "..."` pairs.
struct ResponseDoc {
    status: u16,
    body: Option<Type>,
    description: String,
}

impl ResponseDoc {
    fn to_tokens(&self) -> TokenStream2 {
        let status = self.status;
        let description = &self.description;
        match &self.body {
            Some(body) => quote! { (status = #status, description = #description, body = #body) },
            None => quote! { (status = #status, description = #description) },
        }
    }
}

impl syn::parse::Parse for ResponseDoc {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        if !input.peek2(syn::Token![=]) {
            return Ok(ResponseDoc {
                status: 200,
                body: Some(input.parse()?),
                description: "Success".into(),
            });
        }

        let mut status = None;
        let mut body = None;
        let mut description = None;

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            input.parse::<syn::Token![=]>()?;

            match key.to_string().as_str() {
                "status" => status = Some(input.parse::<LitInt>()?.base10_parse::<u16>()?),
                "body" => body = Some(input.parse::<Type>()?),
                "description" => description = Some(input.parse::<LitStr>()?.value()),
                other => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!("unknown argument `{other}`"),
                    ))
                }
            }

            if !input.is_empty() {
                input.parse::<syn::Token![,]>()?;
            }
        }

        let status = status.unwrap_or(200);
        Ok(ResponseDoc {
            status,
            body,
            description: description.unwrap_or_else(|| default_description(status).into()),
        })
    }
}

fn default_description(status: u16) -> &'static str {
    match status {
        200..=299 => "Success",
        400 => "Bad request",
        404 => "Not found",
        500 => "Internal server error",
        _ => "Response",
    }
}

/// Registers a GET handler inside a `#[controller]` impl block.
#[proc_macro_attribute]
pub fn get(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}

/// Registers a POST handler inside a `#[controller]` impl block.
#[proc_macro_attribute]
pub fn post(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}

/// Registers a PUT handler inside a `#[controller]` impl block.
#[proc_macro_attribute]
pub fn put(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}

/// Registers a DELETE handler inside a `#[controller]` impl block.
#[proc_macro_attribute]
pub fn delete(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}

/// Registers a PATCH handler inside a `#[controller]` impl block.
#[proc_macro_attribute]
pub fn patch(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}

/// Documents one response of a handler; may be repeated.
///
/// Read by `#[controller]` when it builds the OpenAPI struct, otherwise a
/// pass-through.
#[proc_macro_attribute]
pub fn utoipa_response(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}
