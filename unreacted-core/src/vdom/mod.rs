//! Virtual Tree
//!
//! Lightweight, immutable descriptions of UI. Components return a [`VNode`]
//! on every render; the reconciler compares it with the previous one and
//! patches the live tree.
//!
//! # Building Trees
//!
//! [`create_element`] is the plain constructor. The [`h!`](crate::h) macro is
//! the variadic form most components use:
//!
//! ```rust
//! use unreacted_core::{h, vdom::{handler, Style}};
//!
//! let count = 3;
//! let tree = h!("div", { "className" => "counter" },
//!     h!("h1", {}, format!("Count: {count}")),
//!     h!("button", {
//!         "onclick" => handler(|_| println!("clicked")),
//!         "style" => Style::new().with("marginLeft", "5px"),
//!     }, "Increment"),
//! );
//! assert_eq!(tree.children().len(), 2);
//! ```

mod node;
mod props;

pub use node::{create_element, Child, VNode};
pub use props::{handler, PropValue, Props, Style};

/// Build a [`Props`] from `key => value` pairs.
///
/// ```rust
/// use unreacted_core::props;
///
/// let props = props! { "id" => "root", "tabindex" => 0 };
/// assert_eq!(props.len(), 2);
/// ```
#[macro_export]
macro_rules! props {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut props = $crate::vdom::Props::new();
        $( props.insert($key, $value); )*
        props
    }};
}

/// Build a [`VNode`]: `h!(tag)`, `h!(tag, { props })` or
/// `h!(tag, { props }, child, child, ...)`.
///
/// Children may be anything convertible into a [`Child`]: nodes, strings
/// and numbers.
#[macro_export]
macro_rules! h {
    ($tag:expr) => {
        $crate::vdom::create_element(
            $tag,
            $crate::vdom::Props::new(),
            ::std::vec::Vec::<$crate::vdom::Child>::new(),
        )
    };
    ($tag:expr, { $($key:expr => $value:expr),* $(,)? } $(, $child:expr)* $(,)?) => {{
        let children: ::std::vec::Vec<$crate::vdom::Child> =
            ::std::vec![$($crate::vdom::Child::from($child)),*];
        $crate::vdom::create_element($tag, $crate::props! { $($key => $value),* }, children)
    }};
}
