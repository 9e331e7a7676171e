//! Column visiting order for alpha-beta search

/// Returns the columns ordered from the middle outwards, as the middle
/// columns are often better moves
///
/// Left of centre comes before right of centre at each distance. The order
/// only depends on the width of the board, never on what is in it.
pub fn column_order(num_columns: usize) -> Vec<usize> {
    let middle = num_columns / 2;
    let mut order = Vec::with_capacity(num_columns);
    if num_columns == 0 {
        return order;
    }
    order.push(middle);

    for distance in 1..=middle {
        order.push(middle - distance);
        if middle + distance < num_columns {
            order.push(middle + distance);
        }
    }
    order
}
