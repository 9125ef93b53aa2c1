use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use crate::database::models::{
    Action, EntityType, Task, TaskComment, TaskCommentInput, TaskInput, TaskListQuery, TaskUpdate,
};
use crate::database::repositories::TaskRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{ActivityLogger, Claims};

pub async fn create_task(
    claims: Claims,
    task_repository: web::Data<TaskRepository>,
    activity: web::Data<ActivityLogger>,
    request: web::Json<TaskInput>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let input = request.into_inner();
    if input.due_date <= Utc::now().naive_utc() {
        return Err(AppError::bad_request("Due date must be in the future"));
    }

    let task = Task::new(input, claims.user_id());
    task_repository.create(&task).await?;

    activity
        .log(
            Some(claims.user_id()),
            EntityType::TASK,
            task.id,
            Action::CREATED,
            format!("Assigned task \"{}\"", task.title),
            None,
            &req,
        )
        .await;

    let now = Utc::now().naive_utc();
    Ok(HttpResponse::Created().json(ApiResponse::success(task.with_effective_status(now))))
}

pub async fn list_tasks(
    claims: Claims,
    task_repository: web::Data<TaskRepository>,
    query: web::Query<TaskListQuery>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let filters = query.into_inner();
    let tasks = task_repository
        .list(filters.status, filters.priority, filters.assigned_to)
        .await?;

    let now = Utc::now().naive_utc();
    let tasks: Vec<Task> = tasks
        .into_iter()
        .map(|t| t.with_effective_status(now))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(tasks)))
}

pub async fn my_tasks(
    claims: Claims,
    task_repository: web::Data<TaskRepository>,
) -> Result<HttpResponse, AppError> {
    let tasks = task_repository.list_for_assignee(claims.user_id()).await?;

    let now = Utc::now().naive_utc();
    let tasks: Vec<Task> = tasks
        .into_iter()
        .map(|t| t.with_effective_status(now))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(tasks)))
}

async fn load_task_for(
    task_repository: &TaskRepository,
    claims: &Claims,
    id: Uuid,
) -> Result<Task, AppError> {
    let task = task_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Task not found"))?;

    if !claims.is_admin() && task.assigned_to != claims.user_id() {
        return Err(AppError::forbidden("Not your task"));
    }

    Ok(task)
}

pub async fn get_task(
    claims: Claims,
    task_repository: web::Data<TaskRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let task = load_task_for(&task_repository, &claims, path.into_inner()).await?;

    let now = Utc::now().naive_utc();
    Ok(HttpResponse::Ok().json(ApiResponse::success(task.with_effective_status(now))))
}

/// Admins may change anything; the assignee may only move the status.
pub async fn update_task(
    claims: Claims,
    task_repository: web::Data<TaskRepository>,
    activity: web::Data<ActivityLogger>,
    path: web::Path<Uuid>,
    request: web::Json<TaskUpdate>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let update = request.into_inner();

    let task = load_task_for(&task_repository, &claims, id).await?;

    let updated = if claims.is_admin() {
        task_repository.update(id, &update).await?
    } else {
        let touches_more_than_status = update.title.is_some()
            || update.description.is_some()
            || update.due_date.is_some()
            || update.priority.is_some()
            || update.assigned_to.is_some();
        if touches_more_than_status {
            return Err(AppError::forbidden("Assignees may only update the status"));
        }

        let status = update
            .status
            .ok_or_else(|| AppError::bad_request("No fields to update"))?;
        task_repository.update_status(id, &status).await?
    }
    .ok_or_else(|| AppError::not_found("Task not found"))?;

    activity
        .log(
            Some(claims.user_id()),
            EntityType::TASK,
            id,
            Action::UPDATED,
            format!("Updated task \"{}\"", task.title),
            None,
            &req,
        )
        .await;

    let now = Utc::now().naive_utc();
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated.with_effective_status(now))))
}

pub async fn delete_task(
    claims: Claims,
    task_repository: web::Data<TaskRepository>,
    activity: web::Data<ActivityLogger>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let id = path.into_inner();
    if !task_repository.delete(id).await? {
        return Err(AppError::not_found("Task not found"));
    }

    activity
        .log(
            Some(claims.user_id()),
            EntityType::TASK,
            id,
            Action::DELETED,
            "Deleted task".to_string(),
            None,
            &req,
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Task deleted")))
}

pub async fn add_task_comment(
    claims: Claims,
    task_repository: web::Data<TaskRepository>,
    path: web::Path<Uuid>,
    request: web::Json<TaskCommentInput>,
) -> Result<HttpResponse, AppError> {
    let task = load_task_for(&task_repository, &claims, path.into_inner()).await?;

    let comment = TaskComment {
        id: Uuid::new_v4(),
        task_id: task.id,
        user_id: claims.user_id(),
        comment: request.into_inner().comment,
        created_at: Utc::now().naive_utc(),
    };
    task_repository.add_comment(&comment).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(comment)))
}

pub async fn list_task_comments(
    claims: Claims,
    task_repository: web::Data<TaskRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let task = load_task_for(&task_repository, &claims, path.into_inner()).await?;

    let comments = task_repository.comments(task.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(comments)))
}
