//! # Cart Renderer
//!
//! Pure projection of a [`CartSnapshot`] into a view tree.
//!
//! ## Drawer Layout
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ [img]  Rose Serum                       [×]  │  ◄── data-cart-remove
//! │        50 ml                     [-] 2 [+]   │  ◄── data-cart-decrease /
//! │        90.00 SAR                             │      data-cart-increase
//! ├──────────────────────────────────────────────┤
//! │ [img]  Night Cream  (highlighted if last     │
//! │        ...           added)                  │
//! ├──────────────────────────────────────────────┤
//! │ Total                            123.45 SAR  │  ◄── footer
//! │ [            Checkout            ]           │
//! └──────────────────────────────────────────────┘
//!
//!  Empty cart ──► only "Your cart is empty", no footer, no checkout link
//! ```
//!
//! Every control carries `data-line-key` so a click can be turned back into
//! a [`UiIntent`](crate::intent::UiIntent) without looking at the store.

use crate::i18n::{keys, Localizer};
use crate::types::{CartSnapshot, LineItem, VariantId};
use crate::view::{Element, Node};

/// Class applied to the row of the most recently added variant.
pub const HIGHLIGHT_CLASS: &str = "bg-accent/5";

const ROW_CLASS: &str = "flex gap-4 py-4 border-b border-border";

/// Inputs of a render besides the snapshot itself.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub localizer: Localizer<'a>,
    pub last_added: Option<VariantId>,
    pub currency_suffix: &'a str,
    pub checkout_url: &'a str,
}

/// The global item-count badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountBadge {
    pub count: u32,
    pub visible: bool,
}

/// A per-variant quantity badge elsewhere on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantBadge {
    pub variant_id: VariantId,
    pub quantity: u32,
    pub visible: bool,
}

/// Everything a render produces for the drawer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    /// Content of the `data-cart-content` container.
    pub content: Node,

    /// Value for the `data-cart-count` badge.
    pub count_badge: CountBadge,

    /// True when the empty-state message was rendered.
    pub is_empty: bool,
}

/// Renders the drawer content for a snapshot.
///
/// An absent snapshot (nothing loaded yet) renders like an empty cart.
pub fn render_cart(snapshot: Option<&CartSnapshot>, ctx: &RenderContext<'_>) -> CartView {
    let count = snapshot.map(|s| s.item_count).unwrap_or(0);
    let count_badge = CountBadge {
        count,
        visible: count > 0,
    };

    let snapshot = match snapshot {
        Some(s) if !s.is_empty() => s,
        _ => {
            return CartView {
                content: render_empty(ctx),
                count_badge,
                is_empty: true,
            }
        }
    };

    let rows = snapshot.items.iter().map(|item| render_row(item, ctx));

    let content = Node::el("div")
        .class("flex flex-col h-full")
        .child(
            Node::el("div")
                .class("flex-1 overflow-y-auto")
                .attr("data-cart-items", "")
                .children(rows),
        )
        .child(render_footer(snapshot, ctx))
        .into();

    CartView {
        content,
        count_badge,
        is_empty: false,
    }
}

/// Computes the per-variant badges for the variant ids present on the page.
///
/// Hidden when the variant is not in the cart, otherwise shows the total
/// units of that variant.
pub fn variant_badges(snapshot: Option<&CartSnapshot>, variant_ids: &[VariantId]) -> Vec<VariantBadge> {
    variant_ids
        .iter()
        .map(|&variant_id| {
            let quantity = snapshot.map(|s| s.quantity_of(variant_id)).unwrap_or(0);
            VariantBadge {
                variant_id,
                quantity,
                visible: quantity > 0,
            }
        })
        .collect()
}

fn render_empty(ctx: &RenderContext<'_>) -> Node {
    Node::el("div")
        .class("flex flex-col items-center justify-center py-16 px-6 text-center")
        .child(
            Node::el("p")
                .class("text-muted-foreground")
                .attr("data-i18n", keys::CART_EMPTY)
                .text(ctx.localizer.t(keys::CART_EMPTY)),
        )
        .into()
}

fn render_row(item: &LineItem, ctx: &RenderContext<'_>) -> Node {
    let key = item.key.as_str();
    let class = if ctx.last_added == Some(item.variant_id) {
        format!("{} {}", ROW_CLASS, HIGHLIGHT_CLASS)
    } else {
        ROW_CLASS.to_string()
    };

    let mut row = Node::el("div")
        .class(class)
        .attr("data-line-row", key)
        .attr("data-variant-id", item.variant_id.to_string());

    if let Some(image_url) = &item.image_url {
        row = row.child(
            Node::el("img")
                .attr("src", image_url.as_str())
                .attr("alt", item.title.as_str())
                .class("w-20 h-20 object-cover rounded-sm"),
        );
    }

    row.child(
        Node::el("div")
            .class("flex-1")
            .child(
                Node::el("h4")
                    .class("font-display font-medium text-sm mb-1")
                    .text(item.product_title.as_str()),
            )
            .child(
                Node::el("p")
                    .class("text-xs text-muted-foreground mb-2")
                    .text(item.variant_title.as_str()),
            )
            .child(
                Node::el("p")
                    .class("text-sm font-semibold")
                    .text(item.line_price.with_suffix(ctx.currency_suffix)),
            ),
    )
    .child(
        Node::el("div")
            .class("flex flex-col items-end gap-2")
            .child(
                control_button("data-cart-remove", key)
                    .attr("aria-label", "remove")
                    .class("text-muted-foreground hover:text-destructive transition-colors")
                    .text("×"),
            )
            .child(
                Node::el("div")
                    .class("flex items-center gap-2 border border-border rounded-sm")
                    .child(
                        control_button("data-cart-decrease", key)
                            .class("px-2 py-1 hover:bg-muted transition-colors")
                            .text("-"),
                    )
                    .child(
                        Node::el("span")
                            .class("px-2 text-sm font-medium")
                            .attr("data-line-quantity", key)
                            .text(item.quantity.to_string()),
                    )
                    .child(
                        control_button("data-cart-increase", key)
                            .class("px-2 py-1 hover:bg-muted transition-colors")
                            .text("+"),
                    ),
            ),
    )
    .into()
}

fn control_button(role: &str, key: &str) -> Element {
    Node::el("button").flag(role).attr("data-line-key", key)
}

fn render_footer(snapshot: &CartSnapshot, ctx: &RenderContext<'_>) -> Node {
    Node::el("div")
        .class("border-t border-border p-6 space-y-4")
        .attr("data-cart-footer", "")
        .child(
            Node::el("div")
                .class("flex justify-between items-center text-lg font-display font-semibold")
                .child(
                    Node::el("span")
                        .attr("data-i18n", keys::CART_TOTAL)
                        .text(ctx.localizer.t(keys::CART_TOTAL)),
                )
                .child(
                    Node::el("span")
                        .attr("data-cart-total", "")
                        .text(snapshot.total_price.with_suffix(ctx.currency_suffix)),
                ),
        )
        .child(
            Node::el("a")
                .attr("href", ctx.checkout_url)
                .class("w-full block text-center py-4 px-8 font-bold text-sm tracking-wider uppercase rounded-sm")
                .attr("data-i18n", keys::CART_CHECKOUT)
                .text(ctx.localizer.t(keys::CART_CHECKOUT)),
        )
        .into()
}
