use proptest::prelude::*;

use aquifer::{
    connection_token, entity_accessor_token, manager_token, options_token, ConnectOptions,
    ConnectionId, EntityType,
};

struct User;

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9]{0,15}"
}

proptest! {
    /// Property: every identifier form resolving to the same name derives
    /// the same tokens.
    ///
    /// A name, an options value carrying that name, and an already-open
    /// connection with that name must all be interchangeable when looking
    /// up providers.
    #[test]
    fn prop_identifier_forms_agree(name in name_strategy()) {
        let options = ConnectOptions::named(name.clone());

        let by_name = ConnectionId::Name(&name);
        let by_config = ConnectionId::Config(&options);

        prop_assert_eq!(connection_token(by_name), connection_token(by_config));
        prop_assert_eq!(manager_token(by_name), manager_token(by_config));
        prop_assert_eq!(options_token(by_name), options_token(by_config));
        prop_assert_eq!(
            entity_accessor_token(&EntityType::of::<User>(), by_name, "test").unwrap(),
            entity_accessor_token(&EntityType::of::<User>(), by_config, "test").unwrap()
        );
    }

    /// Property: non-default names always produce name-prefixed tokens,
    /// never the bare default markers.
    #[test]
    fn prop_named_tokens_carry_the_name(name in name_strategy()) {
        prop_assume!(name != "default");

        let id = ConnectionId::Name(&name);

        let connection = connection_token(id);
        let manager = manager_token(id);
        let options = options_token(id);
        let accessor = entity_accessor_token(&EntityType::of::<User>(), id, "test").unwrap();

        prop_assert_eq!(connection.as_str(), format!("{name}DataSource"));
        prop_assert_eq!(manager.as_str(), format!("{name}EntityManager"));
        prop_assert_eq!(options.as_str(), format!("{name}DataSourceOptions"));
        prop_assert_eq!(accessor.as_str(), format!("{name}_UserRepository"));
    }

    /// Property: empty and absent names collapse to the default markers.
    #[test]
    fn prop_blank_names_resolve_to_default(use_empty in any::<bool>()) {
        let options = if use_empty {
            ConnectOptions::named("")
        } else {
            ConnectOptions::default()
        };

        let id = ConnectionId::Config(&options);

        let connection = connection_token(id);
        let manager = manager_token(id);
        let manager_options = options_token(id);

        prop_assert_eq!(connection.as_str(), "DataSource");
        prop_assert_eq!(manager.as_str(), "EntityManager");
        prop_assert_eq!(manager_options.as_str(), "DataSourceOptions");
    }
}
