use chrono::NaiveDate;
use fit_diary_core::{
    resolve_units, ApiError, BatchSubmitter, ConversionParams, DiaryApi, HttpDiaryApi, MealType,
    NutritionTotals, PendingBatch, PendingDiaryEntry, SubmitError, UnitResolution, UnitSource,
};
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn entry(is_food: bool) -> PendingDiaryEntry {
    let totals = NutritionTotals::new(210.0, 14.0, 1.5, 16.0);
    PendingDiaryEntry {
        id: Uuid::new_v4(),
        display_name: "Breakfast omelette".to_string(),
        is_food,
        item_id: "3".to_string(),
        item_name: "Omelette".to_string(),
        meal_type: MealType::Breakfast,
        meal_type_label: "Breakfast".to_string(),
        meal_time: None,
        date_consumed: NaiveDate::from_ymd_opt(2025, 2, 14).unwrap(),
        quantity: 1.0,
        servings_consumed: 1.0,
        unit_id: None,
        unit_label: "Serving".to_string(),
        per_serving: totals,
        totals,
    }
}

#[tokio::test]
async fn test_units_for_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get_units.php"))
        .and(query_param("action", "for_food"))
        .and(query_param("food_id", "66"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {"id": 40, "name": "Cup", "abbreviation": "cp", "is_default": 0},
                {"id": "41", "name": "Tablespoon", "abbreviation": "tbsp", "is_default": "1"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpDiaryApi::new(server.uri()).with_token("secret");
    let units = api.units_for_item(66).await.unwrap();

    assert_eq!(units.len(), 2);
    assert_eq!(units[0].id, "40");
    assert!(!units[0].is_default);
    assert!(units[1].is_default);
}

#[tokio::test]
async fn test_resolver_falls_back_to_catalog_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get_units.php"))
        .and(query_param("action", "for_food"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/get_units.php"))
        .and(query_param("action", "all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"id": 40, "name": "Cup", "abbreviation": "cp"}]
        })))
        .mount(&server)
        .await;

    let api = HttpDiaryApi::new(server.uri());
    let resolution = resolve_units(&api, "taco_66").await;

    match resolution {
        UnitResolution::Resolved {
            units,
            selected,
            source,
        } => {
            assert_eq!(source, UnitSource::Catalog);
            assert_eq!(units.len(), 4);
            assert_eq!(selected, "31");
        }
        UnitResolution::Unavailable => panic!("expected catalog units"),
    }
}

#[tokio::test]
async fn test_convert_posts_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/calculate_nutrition.php"))
        .and(body_string_contains("food_id=66"))
        .and(body_string_contains("unit_id=40"))
        .and(body_string_contains("is_recipe=0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "nutrition": {"kcal": 416, "protein": "8.6", "carbs": 89.6, "fat": 0.6},
                "unit_info": {"name": "cup"},
                "quantity_in_base_unit": 320
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpDiaryApi::new(server.uri());
    let params = ConversionParams {
        item_id: 66,
        quantity: 2.0,
        unit_id: "40".to_string(),
        is_recipe: false,
    };
    let conversion = api.convert(&params).await.unwrap();

    assert_eq!(
        conversion.nutrition,
        NutritionTotals::new(416.0, 8.6, 89.6, 0.6)
    );
    assert_eq!(conversion.caption(2.0), "2 cup = 320g");
}

#[tokio::test]
async fn test_convert_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/calculate_nutrition.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Unit not found for this food"
        })))
        .mount(&server)
        .await;

    let api = HttpDiaryApi::new(server.uri());
    let params = ConversionParams {
        item_id: 66,
        quantity: 1.0,
        unit_id: "99".to_string(),
        is_recipe: false,
    };

    assert_eq!(
        api.convert(&params).await.unwrap_err(),
        ApiError::Rejected("Unit not found for this food".to_string())
    );
}

#[tokio::test]
async fn test_submit_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/log_meal_batch.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "2 meals logged"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpDiaryApi::new(server.uri());
    let mut batch = PendingBatch::new();
    batch.append(entry(false));
    batch.append(entry(true));

    let outcome = BatchSubmitter::new()
        .submit_all(&api, &mut batch)
        .await
        .unwrap();

    assert_eq!(outcome.message, "2 meals logged");
    assert_eq!(outcome.redirect, "/diario?date=2025-02-14");
    assert!(batch.is_empty());

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["batch"], "1");
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["is_food"], 0);
    assert_eq!(items[0]["recipe_id"], "3");
    assert_eq!(items[0]["meal_type"], "breakfast");
    assert_eq!(items[0]["meal_time"], "");
    assert_eq!(items[0]["meal_time_label"], "No time");
    assert_eq!(items[0]["date_consumed"], "2025-02-14");
    assert_eq!(items[1]["is_food"], 1);
    assert_eq!(items[1]["food_id"], "3");
    assert_eq!(items[1]["total_kcal"], 210.0);
}

#[tokio::test]
async fn test_submit_batch_failure_keeps_entries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/log_meal_batch.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Invalid meal date"
        })))
        .mount(&server)
        .await;

    let api = HttpDiaryApi::new(server.uri());
    let mut batch = PendingBatch::new();
    batch.append(entry(false));
    let before = batch.clone();

    let err = BatchSubmitter::new()
        .submit_all(&api, &mut batch)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SubmitError::Api(ApiError::Rejected("Invalid meal date".to_string()))
    );
    assert_eq!(batch, before);
}

#[tokio::test]
async fn test_unauthorized_and_bad_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("action", "all"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("action", "for_food"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/get_add_food_data.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let api = HttpDiaryApi::new(server.uri());

    assert_eq!(
        api.unit_catalog().await.unwrap_err(),
        ApiError::Unauthenticated
    );
    assert_eq!(
        api.units_for_item(1).await.unwrap_err(),
        ApiError::EmptyResponse
    );
    assert!(matches!(
        api.page_defaults(None, None).await.unwrap_err(),
        ApiError::InvalidResponse(_)
    ));
}

#[tokio::test]
async fn test_page_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get_add_food_data.php"))
        .and(query_param("date", "2025-02-14"))
        .and(query_param("meal_type", "dinner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "date": "2025-02-14",
                "meal_type": "dinner",
                "meal_type_options": {"dinner": "Jantar"},
                "favorite_recipes": [],
                "recent_recipes": [{"id": "9", "name": "Soup", "kcal_per_serving": "180"}]
            }
        })))
        .mount(&server)
        .await;

    let api = HttpDiaryApi::new(server.uri());
    let defaults = api
        .page_defaults(NaiveDate::from_ymd_opt(2025, 2, 14), Some(MealType::Dinner))
        .await
        .unwrap();

    assert_eq!(defaults.meal_type, MealType::Dinner);
    assert_eq!(defaults.recent_recipes[0].kcal_per_serving, 180.0);
    assert!(!defaults.recent_recipes[0].is_food);
}
