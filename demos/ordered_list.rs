use lrukit::ds::OrderedList;

fn main() {
    let mut list = OrderedList::new();
    let five = list.add_to_head(5);
    let four = list.add_to_head(4);

    println!("head: {:?}, tail: {:?}", list.head(), list.tail());
    println!("head id = {:?}, tail id = {:?}", four, five);

    list.add_to_tail(9);
    list.move_to_head(five);
    println!("values: {:?}", list.iter().collect::<Vec<_>>());
    println!("max: {:?}", list.max());
}

// Expected output (ids elided):
// head: Some(4), tail: Some(5)
// values: [5, 4, 9]
// max: Some(9)
