use chrono::NaiveDate;
use meal_planner::backend::{ApiError, LikedRecipesApi, MealPlanApi, RestClient, ShoppingListApi};
use meal_planner::planner::{DateRange, MealType, NewMealPlan, NewShoppingList};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn week_of_june_10() -> DateRange {
    DateRange::new(date(2024, 6, 10), date(2024, 6, 16))
}

#[tokio::test]
async fn queries_meal_plans_with_inclusive_date_range() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meal-planning/plans"))
        .and(query_param("user_id", "1"))
        .and(query_param("start_date", "2024-06-10"))
        .and(query_param("end_date", "2024-06-16"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "user_id": 1, "recipe_id": 5, "meal_date": "2024-06-10T12:00:00", "meal_type": "breakfast", "servings": 2, "created_at": "2024-06-01T08:00:00"},
            {"id": 2, "user_id": 1, "recipe_id": 6, "meal_date": "2024-06-13T12:00:00", "meal_type": "dinner", "servings": 4}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = RestClient::new(server.uri());
    let plans = client.query_meal_plans(1, week_of_june_10()).await.unwrap();

    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0].meal_type, MealType::Breakfast);
    assert_eq!(plans[1].day(), date(2024, 6, 13));
    assert_eq!(plans[1].servings, 4);
}

#[tokio::test]
async fn adds_meal_plan_at_noon() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/meal-planning/plans"))
        .and(query_param("user_id", "1"))
        .and(body_json(json!({
            "recipe_id": 42,
            "meal_date": "2024-06-12T12:00:00",
            "meal_type": "lunch",
            "servings": 2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"id": 9, "user_id": 1, "recipe_id": 42, "meal_date": "2024-06-12T12:00:00", "meal_type": "lunch", "servings": 2}
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = RestClient::new(server.uri());
    let new_plan = NewMealPlan::for_slot(date(2024, 6, 12), MealType::Lunch, 42, 2);
    let created = client.add_meal_plan(1, &new_plan).await.unwrap();

    assert_eq!(created.id, 9);
    assert_eq!(created.recipe_id, 42);
}

#[tokio::test]
async fn occupied_slot_is_a_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/meal-planning/plans"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "detail": "A meal is already planned for lunch on 2024-06-12"
        })))
        .mount(&server)
        .await;

    let client = RestClient::new(server.uri());
    let new_plan = NewMealPlan::for_slot(date(2024, 6, 12), MealType::Lunch, 42, 2);
    let result = client.add_meal_plan(1, &new_plan).await;

    match result {
        Err(ApiError::Conflict(detail)) => assert_eq!(detail, "A meal is already planned for lunch on 2024-06-12"),
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn removes_meal_plan_for_owner() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/meal-planning/plans/9"))
        .and(query_param("user_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = RestClient::new(server.uri());

    client.remove_meal_plan(9, 1).await.unwrap();
}

#[tokio::test]
async fn removing_missing_plan_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/meal-planning/plans/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Meal plan not found"})))
        .mount(&server)
        .await;

    let client = RestClient::new(server.uri());
    let result = client.remove_meal_plan(9, 1).await;

    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meal-planning/plans"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = RestClient::new(server.uri());
    let result = client.query_meal_plans(1, week_of_june_10()).await;

    assert!(matches!(result, Err(ApiError::Parse(_))));
}

#[tokio::test]
async fn server_error_is_rejected_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recipes/liked/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let client = RestClient::new(server.uri());
    let result = client.liked_recipes(1).await;

    match result {
        Err(ApiError::Rejected { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn fetches_liked_recipes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recipes/liked/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "title": "Katsu Curry", "cooking_time": 40, "budget": 9.5, "cuisine": "Japanese"}
        ])))
        .mount(&server)
        .await;

    let client = RestClient::new(server.uri());
    let recipes = client.liked_recipes(1).await.unwrap();

    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].title, "Katsu Curry");
    assert_eq!(recipes[0].cuisine.as_deref(), Some("Japanese"));
}

#[tokio::test]
async fn generates_list_from_date_range_with_encoded_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/shopping/from-meal-plans"))
        .and(query_param("user_id", "1"))
        .and(query_param("start_date", "2024-06-10"))
        .and(query_param("end_date", "2024-06-16"))
        .and(query_param("list_name", "Groceries & snacks + 50% off"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "user_id": 1,
            "name": "Groceries & snacks + 50% off",
            "items": [
                {"id": 1, "list_id": 3, "ingredient": "2 eggs", "quantity": "2", "is_checked": false}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = RestClient::new(server.uri());
    let list = client
        .create_from_date_range(1, week_of_june_10(), "Groceries & snacks + 50% off")
        .await
        .unwrap();

    assert_eq!(list.id, 3);
    assert_eq!(list.items[0].quantity, "2");
}

#[tokio::test]
async fn creates_list_from_recipes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/shopping/lists"))
        .and(query_param("user_id", "1"))
        .and(body_json(json!({"name": "Party", "recipe_ids": [4, 9]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5, "name": "Party", "items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = RestClient::new(server.uri());
    let request = NewShoppingList {
        name: "Party".to_string(),
        recipe_ids: vec![4, 9],
    };
    let list = client.create_from_recipes(1, &request).await.unwrap();

    assert_eq!(list.name, "Party");
}

#[tokio::test]
async fn toggles_item() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/shopping/items/12/toggle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "is_checked": true})))
        .mount(&server)
        .await;

    let client = RestClient::new(server.uri());

    assert!(client.toggle_item(12).await.unwrap());
}

#[tokio::test]
async fn lists_and_deletes_shopping_lists() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/shopping/lists"))
        .and(query_param("user_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "name": "A", "items": []},
            {"id": 4, "name": "B", "items": []}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shopping/lists/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 4, "name": "B", "items": []})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/shopping/lists/4"))
        .and(query_param("user_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = RestClient::new(server.uri());

    assert_eq!(client.shopping_lists(1).await.unwrap().len(), 2);
    assert_eq!(client.shopping_list(4).await.unwrap().name, "B");
    client.delete_shopping_list(4, 1).await.unwrap();
}
