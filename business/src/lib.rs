pub mod application {
    pub mod session {
        pub mod controller;
        pub mod mutation;
    }
    pub mod shopping_list {
        pub mod add_item;
        pub mod add_note;
        pub mod complete;
        pub mod create;
        pub mod delete;
        pub mod delete_item;
        pub mod edit_item;
        pub mod get_history;
        pub mod get_in_progress;
        pub mod mutator;
        pub mod resolve;
        pub mod set_item_completed;
    }
}

pub mod domain {
    pub mod errors;
    pub mod logger;
    pub mod shopping_list {
        pub mod display;
        pub mod errors;
        pub mod model;
        pub mod repository;
        pub mod subscription;
        pub mod value_objects;
        pub mod use_cases {
            pub mod add_item;
            pub mod add_note;
            pub mod complete;
            pub mod create;
            pub mod delete;
            pub mod delete_item;
            pub mod edit_item;
            pub mod get_history;
            pub mod get_in_progress;
            pub mod resolve;
            pub mod set_item_completed;
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support;
