//! Receipt rendering for a submitted order.
//!
//! Pure string building: the only side effect in the whole submission path
//! is drawing the illustration index.

use rand::Rng;

use super::order::CompletedOrder;

/// Inclusive upper bound of the illustration index.
pub const MAX_IMAGE_INDEX: u8 = 6;

const IMAGE_BASE_URL: &str = "https://static.pizza-intake.dev/img/order";

/// Renders the confirmation receipt with a uniformly random illustration.
pub fn render(order: &CompletedOrder) -> String {
    let index = rand::thread_rng().gen_range(0..=MAX_IMAGE_INDEX);
    render_with_image(order, index)
}

/// Renders the confirmation receipt with a fixed illustration index in
/// `0..=MAX_IMAGE_INDEX`. Deterministic; the random draw lives in [`render`].
pub fn render_with_image(order: &CompletedOrder, image_index: u8) -> String {
    format!(
        "<h3>ORDER CONFIRMED</h3><br>\
         <table>\
         <tr><td>Pizza type</td><td>{pizza_type}</td></tr>\
         <tr><td>Name</td><td>{name}</td></tr>\
         <tr><td>Address</td><td>{address}</td></tr>\
         <tr><td>Phone</td><td>{phone}</td></tr>\
         </table><br>\
         Thanks for your order, your pizza is on its way!<br>\
         <img style='width:400px' src='{base}/pizza{index}.jpg'>",
        pizza_type = order.pizza_type,
        name = order.name,
        address = order.address,
        phone = order.phone,
        base = IMAGE_BASE_URL,
        index = image_index,
    )
}
