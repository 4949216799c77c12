//! Scope CSS rules under a namespace selector.
//!
//! Every eligible rule of a stylesheet is rewritten so it only applies inside
//! the namespace: `.foo {}` becomes `.my-component .foo {}`. Self references
//! (`:--namespace` by default) are replaced by the namespace itself, and
//! selectors starting with `:root` are left unprefixed.
//!
//! # Example
//!
//! ```
//! use css_parser::{Processor, ProcessOptions};
//! use selector_namespace::{selector_namespace, NamespaceOptions};
//!
//! let plugin = selector_namespace(NamespaceOptions::with_namespace(".card")).unwrap();
//! let result = Processor::new()
//!     .with(plugin)
//!     .process(":--namespace { display: flex } .title {}", ProcessOptions::default())
//!     .unwrap();
//! assert_eq!(result.css, ".card { display: flex } .card .title {}");
//! ```

mod eligibility;
mod error;
mod html_tag;
mod options;
mod pattern;
mod plugin;
mod resolver;
mod rewrite;

pub use eligibility::is_eligible;
pub use error::{BoxError, NamespaceError, OptionsError};
pub use options::{Namespace, NamespaceFn, NamespaceOptions};
pub use pattern::SelectorPattern;
pub use plugin::{selector_namespace, NamespaceReport, SelectorNamespace};
pub use resolver::resolve;
