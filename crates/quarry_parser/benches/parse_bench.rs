use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quarry_parser::{parse, ParserOptions};

// A medium-size TypeScript module with the usual mix of declarations
const TYPESCRIPT_SOURCE: &str = r#"
interface User {
    id: number;
    name: string;
    email: string;
    age?: number;
    preferences: UserPreferences;
}

interface UserPreferences {
    theme: 'light' | 'dark';
    notifications: boolean;
    language: string;
}

type UserID = number;
type UserMap = Map<UserID, User>;
type Handler<T> = (event: T) => void;

enum Status {
    Active = 'active',
    Inactive = 'inactive',
    Banned = 'banned',
}

class UserService {
    private users: UserMap;
    private nextId: UserID;
    private listeners: Handler<User>[] = [];

    constructor(private readonly origin: string) {
        this.users = new Map();
        this.nextId = 1;
    }

    addUser(name: string, email: string, age?: number): User {
        const user: User = {
            id: this.nextId++,
            name,
            email,
            age,
            preferences: {
                theme: 'light',
                notifications: true,
                language: 'en',
            },
        };
        this.users.set(user.id, user);
        this.listeners.forEach((listener) => listener(user));
        return user;
    }

    getUser(id: UserID): User | undefined {
        return this.users.get(id);
    }

    updatePreferences(id: UserID, prefs: Partial<UserPreferences>): boolean {
        const user = this.users.get(id);
        if (!user) {
            return false;
        }
        user.preferences = { ...user.preferences, ...prefs };
        return true;
    }

    async fetchRemote(id: UserID): Promise<User | null> {
        const response = await fetch(`${this.origin}/users/${id}`);
        return response.ok ? ((await response.json()) as User) : null;
    }

    get count(): number {
        return this.users.size;
    }
}

function filterUsers<T extends User>(users: T[], predicate: (user: T) => boolean): T[] {
    const result: T[] = [];
    for (const user of users) {
        if (predicate(user)) {
            result.push(user);
        }
    }
    return result;
}

function isAdult(user: User): user is User & { age: number } {
    return user.age !== undefined && user.age >= 18;
}

namespace Validation {
    export const emailPattern = /^[^@]+@[^@]+$/;
    export function isEmail(value: string): boolean {
        return emailPattern.test(value);
    }
}

const service = new UserService('https://example.com');
const alice = service.addUser('Alice', 'alice@example.com', 30);
const adults = filterUsers([alice], isAdult);
const label = adults.length > 0 ? Status.Active : Status.Inactive;

export { UserService, filterUsers, Validation, label };
export type { User, UserID, UserMap };
export default UserService;
"#;

const JSX_SOURCE: &str = r#"
import { useState } from 'react';

export function TodoList({ items, onToggle }) {
    const [filter, setFilter] = useState('all');
    const visible = items.filter((item) => filter === 'all' || (filter === 'done') === item.done);
    return (
        <section className="todos">
            <header>
                <h1>Todos &amp; chores</h1>
                <select value={filter} onChange={(e) => setFilter(e.target.value)}>
                    <option value="all">All</option>
                    <option value="done">Done</option>
                    <option value="open">Open</option>
                </select>
            </header>
            <ul>
                {visible.map((item) => (
                    <li key={item.id} className={item.done ? 'done' : undefined}>
                        <input type="checkbox" checked={item.done} onChange={() => onToggle(item.id)} />
                        {item.title}
                    </li>
                ))}
            </ul>
            <>{visible.length} of {items.length} shown</>
        </section>
    );
}
"#;

fn bench_parse_typescript(c: &mut Criterion) {
    quarry_parser::tracing_config::init_tracing();
    let options = ParserOptions::module().with_plugin("typescript");
    c.bench_function("parse_typescript_medium", |b| {
        b.iter(|| {
            let output = parse(black_box(TYPESCRIPT_SOURCE), &options);
            black_box(output.ok());
        });
    });
}

fn bench_parse_jsx(c: &mut Criterion) {
    let options = ParserOptions::module().with_plugin("jsx");
    c.bench_function("parse_jsx_component", |b| {
        b.iter(|| {
            let output = parse(black_box(JSX_SOURCE), &options);
            black_box(output.ok());
        });
    });
}

fn bench_parse_estree(c: &mut Criterion) {
    let options = ParserOptions::module().with_plugin("typescript").with_plugin("estree");
    c.bench_function("parse_typescript_estree", |b| {
        b.iter(|| {
            let output = parse(black_box(TYPESCRIPT_SOURCE), &options);
            black_box(output.ok());
        });
    });
}

criterion_group!(benches, bench_parse_typescript, bench_parse_jsx, bench_parse_estree);
criterion_main!(benches);
