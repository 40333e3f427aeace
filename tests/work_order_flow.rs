mod common;

use common::{create_part, create_user, setup_state};
use repair_shop_api::{
    dto::work_orders::{
        AssignMechanicForm, CompleteOrderForm, CreateWorkOrderForm, UpdateStatusForm,
    },
    entity::{
        Role, WorkOrderStatus,
        cars::Entity as Cars,
        parts::Entity as Parts,
        work_order_parts::{Column as LedgerCol, Entity as WorkOrderParts},
        work_orders::Entity as WorkOrders,
    },
    error::AppError,
    middleware::auth::CurrentUser,
    routes::params::WorkOrderListQuery,
    services::work_order_service,
    state::AppState,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

const VIN: &str = "1HGCM82633A004352";

fn honda_form() -> CreateWorkOrderForm {
    CreateWorkOrderForm {
        vin: Some(VIN.into()),
        make: Some("Honda".into()),
        model: Some("Accord".into()),
        year: Some("2003".into()),
        description: Some("Brakes squeal".into()),
    }
}

async fn open_order(state: &AppState, client: &CurrentUser) -> anyhow::Result<i32> {
    let resp = work_order_service::create_work_order(state, client, honda_form()).await?;
    Ok(resp.data.expect("work order").id)
}

fn assign(mechanic: &CurrentUser) -> AssignMechanicForm {
    AssignMechanicForm {
        mechanic_id: Some(mechanic.user_id.to_string()),
    }
}

fn usage(part_id: i32, quantity: i32) -> CompleteOrderForm {
    CompleteOrderForm {
        part_id: Some(part_id.to_string()),
        quantity_used: Some(quantity.to_string()),
    }
}

async fn status_of(state: &AppState, id: i32) -> anyhow::Result<WorkOrderStatus> {
    let order = WorkOrders::find_by_id(id)
        .one(&state.orm)
        .await?
        .expect("work order exists");
    Ok(order.status)
}

async fn stock_of(state: &AppState, id: i32) -> anyhow::Result<i32> {
    let part = Parts::find_by_id(id).one(&state.orm).await?.expect("part exists");
    Ok(part.quantity)
}

async fn ledger_rows(state: &AppState, order_id: i32) -> anyhow::Result<u64> {
    Ok(WorkOrderParts::find()
        .filter(LedgerCol::WorkOrderId.eq(order_id))
        .count(&state.orm)
        .await?)
}

#[tokio::test]
async fn client_order_creates_then_reuses_car_by_vin() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "alice", Role::Client).await?;

    let first = work_order_service::create_work_order(&state, &alice, honda_form())
        .await?
        .data
        .expect("work order");
    assert_eq!(first.status, WorkOrderStatus::Pending);
    assert_eq!(first.client_id, alice.user_id);
    assert_eq!(first.mechanic_id, None);

    let car = Cars::find_by_id(first.car_id)
        .one(&state.orm)
        .await?
        .expect("car created");
    assert_eq!(car.vin.as_deref(), Some(VIN));
    assert_eq!(car.make, "Honda");
    assert_eq!(car.owner_name, "alice");
    assert_eq!(car.owner_id, Some(alice.user_id));

    let second = work_order_service::create_work_order(&state, &alice, honda_form())
        .await?
        .data
        .expect("work order");
    assert_eq!(second.car_id, first.car_id);
    assert_ne!(second.id, first.id);
    assert_eq!(Cars::find().count(&state.orm).await?, 1);
    Ok(())
}

#[tokio::test]
async fn orders_without_vin_always_create_a_car() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "alice", Role::Client).await?;

    for _ in 0..2 {
        let form = CreateWorkOrderForm {
            vin: Some("".into()),
            ..honda_form()
        };
        work_order_service::create_work_order(&state, &alice, form).await?;
    }
    assert_eq!(Cars::find().count(&state.orm).await?, 2);
    Ok(())
}

#[tokio::test]
async fn new_car_requires_make() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "alice", Role::Client).await?;

    let form = CreateWorkOrderForm {
        make: None,
        ..honda_form()
    };
    let err = work_order_service::create_work_order(&state, &alice, form)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(WorkOrders::find().count(&state.orm).await?, 0);
    assert_eq!(Cars::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn only_clients_create_work_orders() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let manager = create_user(&state, "manager", Role::Manager).await?;
    let mechanic = create_user(&state, "bob", Role::Mechanic).await?;

    for user in [&manager, &mechanic] {
        let err = work_order_service::create_work_order(&state, user, honda_form())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { redirect: "/work-orders/", .. }));
    }
    assert_eq!(WorkOrders::find().count(&state.orm).await?, 0);
    assert_eq!(Cars::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn manager_assigns_and_reassigns_mechanic() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "alice", Role::Client).await?;
    let manager = create_user(&state, "manager", Role::Manager).await?;
    let bob = create_user(&state, "bob", Role::Mechanic).await?;
    let carol = create_user(&state, "carol", Role::Mechanic).await?;
    let order_id = open_order(&state, &alice).await?;

    let order = work_order_service::assign_mechanic(&state, &manager, order_id, assign(&bob))
        .await?
        .data
        .expect("work order");
    assert_eq!(order.mechanic_id, Some(bob.user_id));
    assert_eq!(order.status, WorkOrderStatus::InProgress);

    // Assignment overrides whatever status the manager set before.
    work_order_service::update_status(
        &state,
        &manager,
        order_id,
        UpdateStatusForm {
            status: Some("on_hold".into()),
        },
    )
    .await?;

    let order = work_order_service::assign_mechanic(&state, &manager, order_id, assign(&carol))
        .await?
        .data
        .expect("work order");
    assert_eq!(order.mechanic_id, Some(carol.user_id));
    assert_eq!(order.status, WorkOrderStatus::InProgress);
    Ok(())
}

#[tokio::test]
async fn assigning_a_non_mechanic_is_rejected() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "alice", Role::Client).await?;
    let manager = create_user(&state, "manager", Role::Manager).await?;
    let order_id = open_order(&state, &alice).await?;

    let err = work_order_service::assign_mechanic(&state, &manager, order_id, assign(&alice))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = work_order_service::assign_mechanic(
        &state,
        &manager,
        order_id,
        AssignMechanicForm {
            mechanic_id: Some("999".into()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    assert_eq!(status_of(&state, order_id).await?, WorkOrderStatus::Pending);
    Ok(())
}

#[tokio::test]
async fn non_managers_cannot_assign_or_update_status() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "alice", Role::Client).await?;
    let bob = create_user(&state, "bob", Role::Mechanic).await?;
    let order_id = open_order(&state, &alice).await?;

    for user in [&alice, &bob] {
        let err = work_order_service::assign_mechanic(&state, user, order_id, assign(&bob))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));

        let err = work_order_service::update_status(
            &state,
            user,
            order_id,
            UpdateStatusForm {
                status: Some("cancelled".into()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    let order = WorkOrders::find_by_id(order_id)
        .one(&state.orm)
        .await?
        .expect("work order");
    assert_eq!(order.status, WorkOrderStatus::Pending);
    assert_eq!(order.mechanic_id, None);
    Ok(())
}

#[tokio::test]
async fn status_updates_use_the_closed_set() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "alice", Role::Client).await?;
    let manager = create_user(&state, "manager", Role::Manager).await?;
    let order_id = open_order(&state, &alice).await?;

    let order = work_order_service::update_status(
        &state,
        &manager,
        order_id,
        UpdateStatusForm {
            status: Some("on_hold".into()),
        },
    )
    .await?
    .data
    .expect("work order");
    assert_eq!(order.status, WorkOrderStatus::OnHold);

    for bad in ["waiting on customer", "completed", ""] {
        let err = work_order_service::update_status(
            &state,
            &manager,
            order_id,
            UpdateStatusForm {
                status: Some(bad.into()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{bad} should be rejected");
    }
    assert_eq!(status_of(&state, order_id).await?, WorkOrderStatus::OnHold);

    let err = work_order_service::update_status(
        &state,
        &manager,
        4242,
        UpdateStatusForm {
            status: Some("cancelled".into()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn completion_consumes_stock_then_rejects_overdraw() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "alice", Role::Client).await?;
    let manager = create_user(&state, "manager", Role::Manager).await?;
    let bob = create_user(&state, "bob", Role::Mechanic).await?;
    let carol = create_user(&state, "carol", Role::Mechanic).await?;
    let brakes = create_part(&state, "BRK-001", 5).await?;

    let first = open_order(&state, &alice).await?;
    work_order_service::assign_mechanic(&state, &manager, first, assign(&bob)).await?;

    let done = work_order_service::complete_work_order(&state, &bob, first, usage(brakes.id, 3))
        .await?
        .data
        .expect("completion");
    assert_eq!(done.order.status, WorkOrderStatus::Completed);
    let entry = done.ledger_entry.expect("ledger entry");
    assert_eq!(
        (entry.work_order_id, entry.part_id, entry.quantity_used),
        (first, brakes.id, 3)
    );
    assert_eq!(stock_of(&state, brakes.id).await?, 2);
    assert_eq!(ledger_rows(&state, first).await?, 1);

    let second = open_order(&state, &alice).await?;
    work_order_service::assign_mechanic(&state, &manager, second, assign(&carol)).await?;

    let err = work_order_service::complete_work_order(&state, &carol, second, usage(brakes.id, 5))
        .await
        .unwrap_err();
    match err {
        AppError::InsufficientStock {
            part_id,
            requested,
            available,
        } => {
            assert_eq!(part_id, brakes.id);
            assert_eq!(requested, 5);
            assert_eq!(available, 2);
        }
        other => panic!("expected insufficient stock, got {other:?}"),
    }

    assert_eq!(stock_of(&state, brakes.id).await?, 2);
    assert_eq!(ledger_rows(&state, second).await?, 0);
    assert_eq!(status_of(&state, second).await?, WorkOrderStatus::InProgress);
    Ok(())
}

#[tokio::test]
async fn completion_without_parts_skips_the_ledger() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "alice", Role::Client).await?;
    let bob = create_user(&state, "bob", Role::Mechanic).await?;
    let part = create_part(&state, "OIL-5W30", 4).await?;

    let order_id = open_order(&state, &alice).await?;
    let done = work_order_service::complete_work_order(&state, &bob, order_id, usage(part.id, 0))
        .await?
        .data
        .expect("completion");
    assert_eq!(done.order.status, WorkOrderStatus::Completed);
    assert!(done.ledger_entry.is_none());
    assert_eq!(stock_of(&state, part.id).await?, 4);

    let other = open_order(&state, &alice).await?;
    let form = CompleteOrderForm {
        part_id: None,
        quantity_used: None,
    };
    work_order_service::complete_work_order(&state, &bob, other, form).await?;
    assert_eq!(status_of(&state, other).await?, WorkOrderStatus::Completed);
    assert_eq!(WorkOrderParts::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn completion_with_unknown_part_changes_nothing() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "alice", Role::Client).await?;
    let bob = create_user(&state, "bob", Role::Mechanic).await?;
    let order_id = open_order(&state, &alice).await?;

    let err = work_order_service::complete_work_order(&state, &bob, order_id, usage(9999, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    assert_eq!(status_of(&state, order_id).await?, WorkOrderStatus::Pending);
    Ok(())
}

#[tokio::test]
async fn only_mechanics_complete() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "alice", Role::Client).await?;
    let manager = create_user(&state, "manager", Role::Manager).await?;
    let part = create_part(&state, "BRK-001", 5).await?;
    let order_id = open_order(&state, &alice).await?;

    for user in [&alice, &manager] {
        let err = work_order_service::complete_work_order(&state, user, order_id, usage(part.id, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }
    assert_eq!(stock_of(&state, part.id).await?, 5);
    assert_eq!(status_of(&state, order_id).await?, WorkOrderStatus::Pending);
    Ok(())
}

#[tokio::test]
async fn any_mechanic_may_complete_any_order() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "alice", Role::Client).await?;
    let manager = create_user(&state, "manager", Role::Manager).await?;
    let bob = create_user(&state, "bob", Role::Mechanic).await?;
    let carol = create_user(&state, "carol", Role::Mechanic).await?;
    let order_id = open_order(&state, &alice).await?;
    work_order_service::assign_mechanic(&state, &manager, order_id, assign(&bob)).await?;

    let form = CompleteOrderForm {
        part_id: None,
        quantity_used: None,
    };
    work_order_service::complete_work_order(&state, &carol, order_id, form).await?;
    assert_eq!(status_of(&state, order_id).await?, WorkOrderStatus::Completed);
    Ok(())
}

#[tokio::test]
async fn back_to_back_completions_on_shared_stock_never_overdraw() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "alice", Role::Client).await?;
    let bob = create_user(&state, "bob", Role::Mechanic).await?;
    let carol = create_user(&state, "carol", Role::Mechanic).await?;
    let part = create_part(&state, "BRK-001", 5).await?;
    let first = open_order(&state, &alice).await?;
    let second = open_order(&state, &alice).await?;

    // Two mechanics draw on the same part, one request after the other.
    work_order_service::complete_work_order(&state, &bob, first, usage(part.id, 3)).await?;
    let err = work_order_service::complete_work_order(&state, &carol, second, usage(part.id, 3))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InsufficientStock {
            requested: 3,
            available: 2,
            ..
        }
    ));

    assert_eq!(stock_of(&state, part.id).await?, 2);
    assert_eq!(WorkOrderParts::find().count(&state.orm).await?, 1);
    assert_eq!(status_of(&state, first).await?, WorkOrderStatus::Completed);
    assert_eq!(status_of(&state, second).await?, WorkOrderStatus::Pending);
    Ok(())
}

#[tokio::test]
async fn listings_are_filtered_by_role() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "alice", Role::Client).await?;
    let dave = create_user(&state, "dave", Role::Client).await?;
    let manager = create_user(&state, "manager", Role::Manager).await?;
    let bob = create_user(&state, "bob", Role::Mechanic).await?;
    let carol = create_user(&state, "carol", Role::Mechanic).await?;

    let alice_order = open_order(&state, &alice).await?;
    let dave_form = CreateWorkOrderForm {
        vin: Some("JH4KA8260MC000000".into()),
        ..honda_form()
    };
    let dave_order = work_order_service::create_work_order(&state, &dave, dave_form)
        .await?
        .data
        .expect("work order")
        .id;
    let unassigned = open_order(&state, &dave).await?;
    work_order_service::assign_mechanic(&state, &manager, alice_order, assign(&bob)).await?;
    work_order_service::assign_mechanic(&state, &manager, dave_order, assign(&carol)).await?;

    let ids = |user: CurrentUser| {
        let state = state.clone();
        async move {
            let mut ids: Vec<i32> = work_order_service::list_work_orders(
                &state,
                &user,
                WorkOrderListQuery::default(),
            )
            .await?
            .data
            .expect("list")
            .items
            .into_iter()
            .map(|o| o.id)
            .collect();
            ids.sort();
            anyhow::Ok(ids)
        }
    };

    assert_eq!(ids(manager.clone()).await?, vec![alice_order, dave_order, unassigned]);
    assert_eq!(ids(bob.clone()).await?, vec![alice_order, unassigned]);
    assert_eq!(ids(alice.clone()).await?, vec![alice_order]);
    assert_eq!(ids(dave.clone()).await?, vec![dave_order, unassigned]);

    let in_progress = work_order_service::list_work_orders(
        &state,
        &manager,
        WorkOrderListQuery {
            status: Some("in_progress".into()),
            ..WorkOrderListQuery::default()
        },
    )
    .await?;
    assert_eq!(in_progress.meta.expect("meta").total, Some(2));

    let err = work_order_service::get_work_order(&state, &alice, dave_order)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    let detail = work_order_service::get_work_order(&state, &bob, alice_order)
        .await?
        .data
        .expect("detail");
    assert_eq!(detail.client.username, "alice");
    assert_eq!(detail.mechanic.map(|m| m.username).as_deref(), Some("bob"));
    assert_eq!(detail.mechanics.len(), 2);
    Ok(())
}

#[tokio::test]
async fn detail_lists_parts_used() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "alice", Role::Client).await?;
    let bob = create_user(&state, "bob", Role::Mechanic).await?;
    let part = create_part(&state, "BRK-001", 5).await?;
    let order_id = open_order(&state, &alice).await?;

    work_order_service::complete_work_order(&state, &bob, order_id, usage(part.id, 2)).await?;

    let detail = work_order_service::get_work_order(&state, &alice, order_id)
        .await?
        .data
        .expect("detail");
    assert_eq!(detail.parts_used.len(), 1);
    assert_eq!(detail.parts_used[0].part.part_number, "BRK-001");
    assert_eq!(detail.parts_used[0].entry.quantity_used, 2);
    assert_eq!(detail.car.vin.as_deref(), Some(VIN));
    Ok(())
}
