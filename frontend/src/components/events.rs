//! 活动与社团页
//!
//! 静态示例数据，按类别在客户端过滤。

use leptos::prelude::*;

#[derive(Clone, Copy, PartialEq)]
struct CampusEvent {
    title: &'static str,
    category: &'static str,
    date: &'static str,
    location: &'static str,
    desc: &'static str,
}

const CATEGORIES: [&str; 5] = ["All", "Academic", "Sports", "Culture", "Clubs"];

const EVENTS: &[CampusEvent] = &[
    CampusEvent {
        title: "Guest lecture: Distributed systems in practice",
        category: "Academic",
        date: "Mon, Oct 6 · 14:00",
        location: "Engineering Auditorium",
        desc: "Industry talk with Q&A, open to all departments.",
    },
    CampusEvent {
        title: "Intramural basketball finals",
        category: "Sports",
        date: "Tue, Oct 7 · 18:00",
        location: "Main Gym",
        desc: "Faculty of Science vs Faculty of Arts.",
    },
    CampusEvent {
        title: "International food festival",
        category: "Culture",
        date: "Wed, Oct 8 · 11:00",
        location: "Central Quad",
        desc: "Student associations cooking dishes from home.",
    },
    CampusEvent {
        title: "Robotics club open house",
        category: "Clubs",
        date: "Thu, Oct 9 · 16:00",
        location: "Maker Lab, Building C",
        desc: "Demos and sign-ups for new members.",
    },
    CampusEvent {
        title: "Career fair prep workshop",
        category: "Academic",
        date: "Fri, Oct 10 · 10:00",
        location: "Library Seminar Room 2",
        desc: "Resume reviews and mock interviews.",
    },
    CampusEvent {
        title: "Autumn choir concert",
        category: "Culture",
        date: "Fri, Oct 10 · 19:00",
        location: "Concert Hall",
        desc: "Free entry with student ID.",
    },
];

#[component]
pub fn EventsPage() -> impl IntoView {
    let (category, set_category) = signal("All".to_string());

    let filtered = move || {
        let selected = category.get();
        EVENTS
            .iter()
            .copied()
            .filter(|e| selected == "All" || e.category == selected)
            .collect::<Vec<_>>()
    };

    view! {
        <div class="max-w-5xl mx-auto space-y-6">
            <div class="flex items-center justify-between flex-wrap gap-2">
                <div>
                    <h1 class="text-2xl font-bold">"Events & clubs"</h1>
                    <p class="text-base-content/70 text-sm">"What's happening on campus this week."</p>
                </div>
                <div class="join">
                    {CATEGORIES
                        .iter()
                        .map(|c| {
                            let c = *c;
                            view! {
                                <button
                                    class=move || {
                                        if category.get() == c {
                                            "btn btn-sm join-item btn-primary"
                                        } else {
                                            "btn btn-sm join-item"
                                        }
                                    }
                                    on:click=move |_| set_category.set(c.to_string())
                                >
                                    {c}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
            </div>

            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                <For
                    each=filtered
                    key=|e| e.title
                    children=move |event| {
                        view! {
                            <div class="card bg-base-100 shadow-xl">
                                <div class="card-body">
                                    <div class="flex items-start justify-between">
                                        <h2 class="card-title text-base">{event.title}</h2>
                                        <span class="badge badge-accent badge-outline">
                                            {event.category}
                                        </span>
                                    </div>
                                    <p class="text-sm text-base-content/70">{event.desc}</p>
                                    <div class="text-xs text-base-content/50 font-mono">
                                        {event.date} " · " {event.location}
                                    </div>
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </div>
    }
}
