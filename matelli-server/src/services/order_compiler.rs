//! Turns a kit or cart snapshot into an order: total, shopping list and the
//! pre-filled chat message.

use std::fmt::Write;

use rand::Rng;
use rust_decimal::Decimal;
use shared::models::{Meal, Order, OrderItems, OrderStatus, ShoppingList};

use crate::aggregation;

pub const ORDER_ID_PREFIX: &str = "MAT-";

const GREETING: &str = "*Olá Matelli Congelados! Gostaria de finalizar meu pedido:* \n\n";
const KIT_HEADER: &str = "*🍱 MEU KIT SEMANAL (35 Marmitas):*\n";
const MENU_HEADER: &str = "*📖 MEU PEDIDO AVULSO:*\n";
const PRICE_DISCLAIMER: &str =
    "\n*(Os preços serão confirmados na hora de fechar o pedido com a equipe de atendimento)*\n";
const CLOSING: &str = "\n*Aguardo confirmação para pagamento e agendamento!*";

/// `MAT-` followed by four random digits
pub fn draw_order_id(rng: &mut impl Rng) -> String {
    format!("{ORDER_ID_PREFIX}{}", rng.gen_range(1000..10000))
}

/// Money as shown to customers: two decimals, dot separator
pub fn format_brl(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

pub fn order_total(items: &OrderItems) -> Decimal {
    match items {
        OrderItems::Kit(selection) => aggregation::kit_total(selection),
        OrderItems::Menu(cart) => aggregation::cart_total(cart),
    }
}

/// Each distinct meal in the order with its multiplicity: one per filled
/// slot, or the line quantity of a cart entry
fn meal_instances(items: &OrderItems) -> Vec<(&Meal, usize)> {
    match items {
        OrderItems::Kit(selection) => selection.meals().map(|(_, _, meal)| (meal, 1)).collect(),
        OrderItems::Menu(cart) => cart
            .items()
            .map(|item| (&item.meal, item.quantity as usize))
            .collect(),
    }
}

/// Ingredient -> measures, one measure per meal instance.
///
/// Ingredients keep the position of their first appearance; repeated
/// measures stay repeated.
pub fn build_shopping_list(items: &OrderItems) -> ShoppingList {
    let mut list = ShoppingList::new();
    for (meal, times) in meal_instances(items) {
        for (ingredient, measure) in &meal.ingredients {
            list.entry(ingredient.clone())
                .or_default()
                .extend(std::iter::repeat_n(measure.clone(), times));
        }
    }
    list
}

/// Message body for the chat hand-off
pub fn compose_summary_text(items: &OrderItems, total: Decimal, order_id: Option<&str>) -> String {
    let mut text = String::from(GREETING);
    if let Some(id) = order_id {
        let _ = write!(text, "*Pedido: {id}*\n\n");
    }

    match items {
        OrderItems::Kit(selection) => {
            text.push_str(KIT_HEADER);
            for (day, meals) in selection.days() {
                if meals.is_empty() {
                    continue;
                }
                let _ = write!(text, "\n*{}:*\n", day.display_name().to_uppercase());
                for (_, meal) in meals.meals() {
                    let _ = writeln!(text, "- {} (R$ {})", meal.name, format_brl(meal.price));
                }
            }
        }
        OrderItems::Menu(cart) => {
            text.push_str(MENU_HEADER);
            for item in cart.items() {
                let line_total = item.meal.price * Decimal::from(item.quantity);
                let _ = writeln!(
                    text,
                    "- {} x{} (R$ {})",
                    item.meal.name,
                    item.quantity,
                    format_brl(line_total)
                );
            }
        }
    }

    let _ = write!(text, "\n*Valor Total Estimado: R$ {}*\n", format_brl(total));
    text.push_str(PRICE_DISCLAIMER);
    text.push_str(CLOSING);
    text
}

/// Assemble an order from a snapshot. The id is left empty; the store
/// assigns it at insert time.
pub fn compile(items: OrderItems, created_at: i64) -> Order {
    let total = order_total(&items);
    let shopping_list = build_shopping_list(&items);
    Order {
        id: String::new(),
        created_at,
        order_type: items.order_type(),
        total,
        status: OrderStatus::INITIAL,
        items,
        shopping_list,
    }
}
