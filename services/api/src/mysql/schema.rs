table! {
    food (barcode) {
        barcode -> Varchar,
        title -> Varchar,
        ingredients -> Text,
        grade -> Varchar,
        numgrade -> Double,
    }
}

table! {
    ingredients (title) {
        title -> Varchar,
        grade -> Integer,
    }
}

table! {
    missing (id) {
        id -> Integer,
        title -> Varchar,
    }
}
