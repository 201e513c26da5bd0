use recipary_core::db::open_db_in_memory;
use recipary_core::{
    IngredientRow, Recipe, RecipeDraft, RecipeListQuery, RecipeRepository, RecipeService,
    RecipeServiceError, RepoError, SqliteRecipeRepository, Unit,
};
use uuid::Uuid;

fn row(name: &str, quantity: f64, unit: Unit) -> IngredientRow {
    let mut row = IngredientRow::new();
    row.name = name.to_string();
    row.quantity = quantity;
    row.unit = unit;
    row
}

fn draft(title: &str) -> RecipeDraft {
    RecipeDraft {
        title: title.to_string(),
        description: None,
        ingredients: vec![row("flour", 2.0, Unit::Cup), row("salt", 1.0, Unit::Tsp)],
        base_servings: 2,
        instructions: "Mix and bake.".to_string(),
        tags: Vec::new(),
        prep_time_minutes: 10,
        cook_time_minutes: 30,
    }
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let service = RecipeService::new(SqliteRecipeRepository::new(&conn));

    let created = service.create_recipe(&draft("Bread")).unwrap();
    let loaded = service.get_recipe(created.uuid).unwrap().unwrap();

    assert_eq!(loaded.uuid, created.uuid);
    assert_eq!(loaded.title, "Bread");
    assert_eq!(loaded.base_servings, 2);
    assert_eq!(loaded.ingredients.len(), 2);
    assert_eq!(loaded.ingredients[0].id, created.ingredients[0].id);
    assert_eq!(loaded.ingredients[0].name, "flour");
    assert_eq!(loaded.ingredients[0].unit, Unit::Cup);
}

#[test]
fn save_renders_legacy_mirror_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = RecipeService::new(SqliteRecipeRepository::new(&conn));

    let created = service.create_recipe(&draft("Bread")).unwrap();
    let loaded = service.get_recipe(created.uuid).unwrap().unwrap();

    assert_eq!(loaded.ingredients_text, "2 cup flour\n1 tsp salt");
    assert_eq!(loaded.legacy_servings, loaded.base_servings);
}

#[test]
fn save_drops_incomplete_rows_but_keeps_the_rest() {
    let conn = open_db_in_memory().unwrap();
    let service = RecipeService::new(SqliteRecipeRepository::new(&conn));

    let mut input = draft("Bread");
    input.ingredients.push(row("   ", 1.0, Unit::Pcs));

    let created = service.create_recipe(&input).unwrap();
    assert_eq!(created.ingredients.len(), 2);
}

#[test]
fn save_without_any_named_ingredient_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = RecipeService::new(SqliteRecipeRepository::new(&conn));

    let mut input = draft("Bread");
    input.ingredients = vec![row("  ", 1.0, Unit::Pcs)];

    let err = service.create_recipe(&input).unwrap_err();
    assert!(matches!(err, RecipeServiceError::NoIngredients));
}

#[test]
fn save_with_short_title_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = RecipeService::new(SqliteRecipeRepository::new(&conn));

    let err = service.create_recipe(&draft(" ab ")).unwrap_err();
    assert!(matches!(err, RecipeServiceError::Validation(_)));
}

#[test]
fn update_preserves_identity_and_creation_time() {
    let conn = open_db_in_memory().unwrap();
    let service = RecipeService::new(SqliteRecipeRepository::new(&conn));

    let created = service.create_recipe(&draft("Bread")).unwrap();

    let mut changed = draft("Sourdough");
    changed.base_servings = 4;
    let updated = service.update_recipe(created.uuid, &changed).unwrap();

    assert_eq!(updated.uuid, created.uuid);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.title, "Sourdough");
    assert_eq!(updated.base_servings, 4);
    assert_eq!(updated.legacy_servings, 4);

    let loaded = service.get_recipe(created.uuid).unwrap().unwrap();
    assert_eq!(loaded.title, "Sourdough");
}

#[test]
fn update_of_missing_recipe_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = RecipeService::new(SqliteRecipeRepository::new(&conn));

    let missing = Uuid::new_v4();
    let err = service.update_recipe(missing, &draft("Bread")).unwrap_err();
    assert!(matches!(err, RecipeServiceError::RecipeNotFound(id) if id == missing));
}

#[test]
fn delete_removes_the_row_for_good() {
    let conn = open_db_in_memory().unwrap();
    let service = RecipeService::new(SqliteRecipeRepository::new(&conn));

    let created = service.create_recipe(&draft("Bread")).unwrap();
    service.delete_recipe(created.uuid).unwrap();

    assert!(service.get_recipe(created.uuid).unwrap().is_none());

    let err = service.delete_recipe(created.uuid).unwrap_err();
    assert!(matches!(err, RecipeServiceError::RecipeNotFound(_)));
}

#[test]
fn list_orders_by_creation_time_descending() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecipeRepository::new(&conn);

    let mut older = recipe_named("Older");
    older.created_at = 1_000;
    let mut newer = recipe_named("Newer");
    newer.created_at = 2_000;

    repo.create_recipe(&older).unwrap();
    repo.create_recipe(&newer).unwrap();

    let listed = repo.list_recipes(&RecipeListQuery::default()).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].title, "Newer");
    assert_eq!(listed[1].title, "Older");
}

#[test]
fn list_search_matches_title_and_description_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let service = RecipeService::new(SqliteRecipeRepository::new(&conn));

    let mut pancakes = draft("Pancakes");
    pancakes.description = Some("Weekend breakfast".to_string());
    service.create_recipe(&pancakes).unwrap();
    service.create_recipe(&draft("Ramen")).unwrap();

    let by_title = service
        .list_recipes(&RecipeListQuery {
            search: Some("PANcak".to_string()),
            ..RecipeListQuery::default()
        })
        .unwrap();
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].title, "Pancakes");

    let by_description = service
        .list_recipes(&RecipeListQuery {
            search: Some("breakfast".to_string()),
            ..RecipeListQuery::default()
        })
        .unwrap();
    assert_eq!(by_description.len(), 1);

    let no_match = service
        .list_recipes(&RecipeListQuery {
            search: Some("tiramisu".to_string()),
            ..RecipeListQuery::default()
        })
        .unwrap();
    assert!(no_match.is_empty());
}

#[test]
fn list_tag_filter_requires_exact_membership() {
    let conn = open_db_in_memory().unwrap();
    let service = RecipeService::new(SqliteRecipeRepository::new(&conn));

    let mut veggie = draft("Salad");
    veggie.tags = vec!["vegetarian".to_string(), "dinner".to_string()];
    service.create_recipe(&veggie).unwrap();
    service.create_recipe(&draft("Steak")).unwrap();

    let matched = service
        .list_recipes(&RecipeListQuery {
            tag: Some("vegetarian".to_string()),
            ..RecipeListQuery::default()
        })
        .unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].title, "Salad");

    // a tag prefix must not match
    let prefix = service
        .list_recipes(&RecipeListQuery {
            tag: Some("veg".to_string()),
            ..RecipeListQuery::default()
        })
        .unwrap();
    assert!(prefix.is_empty());
}

#[test]
fn list_tags_returns_sorted_union() {
    let conn = open_db_in_memory().unwrap();
    let service = RecipeService::new(SqliteRecipeRepository::new(&conn));

    let mut first = draft("Salad");
    first.tags = vec!["dinner".to_string(), "vegetarian".to_string()];
    service.create_recipe(&first).unwrap();

    let mut second = draft("Granola");
    second.tags = vec!["breakfast".to_string(), "dinner".to_string()];
    service.create_recipe(&second).unwrap();

    assert_eq!(
        service.list_tags().unwrap(),
        vec!["breakfast", "dinner", "vegetarian"]
    );
}

#[test]
fn legacy_rows_fall_back_to_text_fields_on_load() {
    let conn = open_db_in_memory().unwrap();

    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO recipes (uuid, title, ingredients, instructions, servings)
         VALUES (?1, 'Grandma soup', '1 cup stock', 'Simmer.', 3);",
        [id.to_string()],
    )
    .unwrap();

    let repo = SqliteRecipeRepository::new(&conn);
    let loaded = repo.get_recipe(id).unwrap().unwrap();

    assert!(loaded.ingredients.is_empty());
    assert_eq!(loaded.base_servings, 3);
    assert_eq!(loaded.ingredients_text, "1 cup stock");
}

#[test]
fn legacy_zero_servings_default_to_one() {
    let conn = open_db_in_memory().unwrap();

    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO recipes (uuid, title, ingredients, instructions, servings)
         VALUES (?1, 'Old record', '', 'Do nothing.', 0);",
        [id.to_string()],
    )
    .unwrap();

    let repo = SqliteRecipeRepository::new(&conn);
    let loaded = repo.get_recipe(id).unwrap().unwrap();
    assert_eq!(loaded.base_servings, 1);
}

#[test]
fn partial_persisted_ingredient_rows_are_repaired_on_load() {
    let conn = open_db_in_memory().unwrap();

    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO recipes (uuid, title, ingredients, instructions, servings, ingredients_json, base_servings)
         VALUES (?1, 'Imported', '', 'Cook.', 2,
                 '[{\"name\":\"flour\",\"quantity\":\"2\",\"unit\":\"cup\"},{\"quantity\":3}]', 2);",
        [id.to_string()],
    )
    .unwrap();

    let repo = SqliteRecipeRepository::new(&conn);
    let loaded = repo.get_recipe(id).unwrap().unwrap();

    assert_eq!(loaded.ingredients.len(), 2);
    assert_eq!(loaded.ingredients[0].name, "flour");
    assert_eq!(loaded.ingredients[0].quantity, 2.0);
    assert_eq!(loaded.ingredients[0].unit, Unit::Cup);
    assert_eq!(loaded.ingredients[1].quantity, 3.0);
    assert_eq!(loaded.ingredients[1].unit, Unit::Pcs);
}

#[test]
fn unreadable_persisted_json_is_rejected_not_masked() {
    let conn = open_db_in_memory().unwrap();

    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO recipes (uuid, title, ingredients, instructions, servings, ingredients_json)
         VALUES (?1, 'Broken', '', 'Cook.', 1, 'not-json');",
        [id.to_string()],
    )
    .unwrap();

    let repo = SqliteRecipeRepository::new(&conn);
    let err = repo.get_recipe(id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn scale_recipe_returns_a_derived_view_without_saving() {
    let conn = open_db_in_memory().unwrap();
    let service = RecipeService::new(SqliteRecipeRepository::new(&conn));

    let created = service.create_recipe(&draft("Bread")).unwrap();
    let scaled = service.scale_recipe(created.uuid, 4).unwrap();

    assert_eq!(scaled[0].quantity, 4.0);
    assert_eq!(scaled[1].quantity, 2.0);

    let reloaded = service.get_recipe(created.uuid).unwrap().unwrap();
    assert_eq!(reloaded.base_servings, 2);
    assert_eq!(reloaded.ingredients[0].quantity, 2.0);
}

#[test]
fn scale_recipe_for_missing_id_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = RecipeService::new(SqliteRecipeRepository::new(&conn));

    let err = service.scale_recipe(Uuid::new_v4(), 4).unwrap_err();
    assert!(matches!(err, RecipeServiceError::RecipeNotFound(_)));
}

fn recipe_named(title: &str) -> Recipe {
    let mut recipe = Recipe::new(title, "Cook.");
    recipe.ingredients = vec![row("flour", 1.0, Unit::Cup)];
    recipe.ingredients_text = "1 cup flour".to_string();
    recipe
}
